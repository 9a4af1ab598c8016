//! The subtype declaration surface.

use std::any::type_name;
use std::sync::Arc;

use crate::props::Props;
use crate::proxy::{DataProxy, NoopProxy};

use super::{Computed, Mutations};

/// Everything a model subtype declares: its fields and defaults, which
/// writes are transformed, which properties are derived, what the type is
/// called on the wire, and which proxy serves it.
///
/// Schemas are zero-sized markers; a [`Model<S>`](super::Model) never holds
/// an `S` value.
///
/// ```
/// use modelkit::{props, ModelSchema, Mutations, Props, Value};
///
/// struct Person;
///
/// impl ModelSchema for Person {
///     fn defaults() -> Props {
///         props! { "name": null, "up_name": null }
///     }
///
///     fn mutations() -> Mutations<Self> {
///         Mutations::new().with("up_name", |_, value| match value {
///             Value::String(s) => Value::String(s.to_uppercase()),
///             other => other,
///         })
///     }
///
///     fn class_name() -> String {
///         "Person".to_string()
///     }
/// }
/// ```
pub trait ModelSchema: Send + Sync + 'static {
    /// Declared fields and their default values.
    fn defaults() -> Props;

    /// Per-property transforms applied on every external write.
    fn mutations() -> Mutations<Self>
    where
        Self: Sized,
    {
        Mutations::new()
    }

    /// Derived read-only properties.
    fn computed() -> Computed<Self>
    where
        Self: Sized,
    {
        Computed::new()
    }

    /// Logical type name proxies use to address records of this model.
    ///
    /// The default derives the name from the Rust type path and warns on
    /// every use: the derivation changes when the type is renamed or moved,
    /// so it is no stable wire name. Override it for anything that leaves
    /// the process.
    fn class_name() -> String {
        let name = tail_of(type_name::<Self>());
        log::warn!(
            "class name \"{}\" was derived from the type path; \
             override ModelSchema::class_name for a stable name",
            name
        );
        name.to_string()
    }

    /// Proxy serving this schema's models and collections. Defaults to the
    /// no-op proxy; override to wire a real backend.
    fn data_proxy() -> Arc<dyn DataProxy<Self>>
    where
        Self: Sized,
    {
        Arc::new(NoopProxy)
    }
}

/// Last segment of a fully qualified type path.
fn tail_of(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
