//! Change-tracked models: schemas, write mutations, computed properties,
//! dirty state with commit/rollback, and proxy-backed persistence.

mod computed;
mod model;
mod mutations;
mod schema;

pub use computed::{Computed, ComputedFn};
pub use model::Model;
pub use mutations::{MutationFn, Mutations};
pub use schema::ModelSchema;
