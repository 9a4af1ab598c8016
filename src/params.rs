//! Permanent query parameters.
//!
//! Models and collections each carry a set of parameters merged into every
//! proxy call they make; per-call parameters win on key collision.

use serde_json::Value;

use crate::props::{merge, Props};

/// Parameter store shared by [`Model`](crate::Model) and
/// [`Collection`](crate::Collection).
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: Props,
}

impl QueryParams {
    /// Create an empty parameter store.
    pub fn new() -> Self {
        QueryParams {
            params: Props::new(),
        }
    }

    /// Set a single parameter, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// Shallow-merge a patch of parameters into the store.
    pub fn set_many(&mut self, patch: Props) {
        for (key, value) in patch {
            self.params.insert(key, value);
        }
    }

    /// Remove a parameter. No-op when absent.
    pub fn remove(&mut self, key: &str) {
        self.params.remove(key);
    }

    /// Read-only view of the stored parameters.
    pub fn snapshot(&self) -> &Props {
        &self.params
    }

    /// Stored parameters merged with per-call extras; per-call keys win.
    pub(crate) fn merged(&self, extra: Option<&Props>) -> Props {
        merge(&self.params, extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_snapshot() {
        let mut params = QueryParams::new();
        params.set("page_size", 50);
        params.set("token", "abc");

        assert_eq!(params.snapshot().get("page_size"), Some(&json!(50)));
        assert_eq!(params.snapshot().get("token"), Some(&json!("abc")));
    }

    #[test]
    fn set_many_overwrites() {
        let mut params = QueryParams::new();
        params.set("a", 1);

        let mut patch = Props::new();
        patch.insert("a".into(), json!(10));
        patch.insert("b".into(), json!(2));
        params.set_many(patch);

        assert_eq!(params.snapshot().get("a"), Some(&json!(10)));
        assert_eq!(params.snapshot().get("b"), Some(&json!(2)));
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut params = QueryParams::new();
        params.set("a", 1);
        params.remove("missing");
        params.remove("a");
        assert!(params.snapshot().is_empty());
    }

    #[test]
    fn merged_per_call_wins() {
        let mut params = QueryParams::new();
        params.set("scope", "all");
        params.set("limit", 10);

        let mut extra = Props::new();
        extra.insert("limit".into(), json!(25));

        let merged = params.merged(Some(&extra));
        assert_eq!(merged.get("scope"), Some(&json!("all")));
        assert_eq!(merged.get("limit"), Some(&json!(25)));
        // permanent store untouched
        assert_eq!(params.snapshot().get("limit"), Some(&json!(10)));
    }
}
