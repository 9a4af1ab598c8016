mod collection;
mod model;
mod params;
mod props;
mod proxy;

pub use collection::{Collection, Pushable, QueryOpts};
pub use model::{Computed, ComputedFn, Model, ModelSchema, MutationFn, Mutations};
pub use params::QueryParams;
pub use props::Props;
pub use proxy::{DataProxy, MemoryProxy, NoopProxy, ProxyError};

// Re-export the JSON value type stored in models and the attribute
// adapters need to implement DataProxy.
pub use async_trait::async_trait;
pub use serde_json::Value;

// Backing crate for the props! macro expansion.
#[doc(hidden)]
pub use serde_json as __serde_json;
