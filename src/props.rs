//! Props - the plain data object the whole crate trades in.
//!
//! Patches returned by proxies, schema defaults, query parameters, and the
//! backing store of a model's fields are all the same shape: a JSON object.

use serde_json::Value;

/// Plain data object: a JSON map of property name to value.
pub type Props = serde_json::Map<String, Value>;

/// Shallow-merge `extra` over `base`; `extra` wins on key collision.
pub(crate) fn merge(base: &Props, extra: Option<&Props>) -> Props {
    let mut merged = base.clone();
    if let Some(extra) = extra {
        for (key, value) in extra {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Build a [`Props`] map from a JSON object literal.
///
/// ```
/// use modelkit::{props, Props};
///
/// let data: Props = props! { "name": "Alex", "age": 30 };
/// assert_eq!(data.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    ($($body:tt)*) => {
        match $crate::__serde_json::json!({ $($body)* }) {
            $crate::__serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    };
}
