//! Mutation tables: per-property transforms applied on write.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Model, ModelSchema};

/// Transform applied to a raw value before it is stored.
///
/// The first argument is the owning instance, so a transform can read
/// sibling properties mid-transform; the property being written still holds
/// its pre-write value at that point.
pub type MutationFn<S> = dyn Fn(&Model<S>, Value) -> Value + Send + Sync;

/// Property name to transform table declared by a schema.
///
/// Every external write to a property with a registered transform stores the
/// transform's result instead of the raw value. Rollback bypasses the table
/// so restored values come back raw.
pub struct Mutations<S: ModelSchema> {
    table: HashMap<String, Arc<MutationFn<S>>>,
}

impl<S: ModelSchema> Mutations<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Mutations {
            table: HashMap::new(),
        }
    }

    /// Register a transform for `prop`, replacing any existing one.
    pub fn with<F>(mut self, prop: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Model<S>, Value) -> Value + Send + Sync + 'static,
    {
        self.table.insert(prop.into(), Arc::new(transform));
        self
    }

    pub(crate) fn get(&self, prop: &str) -> Option<&Arc<MutationFn<S>>> {
        self.table.get(prop)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S: ModelSchema> Default for Mutations<S> {
    fn default() -> Self {
        Mutations::new()
    }
}

impl<S: ModelSchema> Clone for Mutations<S> {
    fn clone(&self) -> Self {
        Mutations {
            table: self.table.clone(),
        }
    }
}

impl<S: ModelSchema> fmt::Debug for Mutations<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut props: Vec<&str> = self.table.keys().map(String::as_str).collect();
        props.sort_unstable();
        f.debug_struct("Mutations").field("props", &props).finish()
    }
}
