//! Computed properties: derived read-only accessors declared by a schema.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Model, ModelSchema};

/// Accessor for a derived property, evaluated fresh on every read.
pub type ComputedFn<S> = dyn Fn(&Model<S>) -> Value + Send + Sync;

/// Derived property table declared by a schema.
///
/// Computed properties show up in [`Model::props`] and in serialization, are
/// recomputed on every read, never enter the dirty snapshot, and are not
/// settable keys (writes to their names are ignored).
pub struct Computed<S: ModelSchema> {
    table: HashMap<String, Arc<ComputedFn<S>>>,
}

impl<S: ModelSchema> Computed<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Computed {
            table: HashMap::new(),
        }
    }

    /// Register an accessor for `prop`, replacing any existing one.
    pub fn with<F>(mut self, prop: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Model<S>) -> Value + Send + Sync + 'static,
    {
        self.table.insert(prop.into(), Arc::new(accessor));
        self
    }

    pub(crate) fn get(&self, prop: &str) -> Option<&Arc<ComputedFn<S>>> {
        self.table.get(prop)
    }

    pub(crate) fn contains(&self, prop: &str) -> bool {
        self.table.contains_key(prop)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Arc<ComputedFn<S>>)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S: ModelSchema> Default for Computed<S> {
    fn default() -> Self {
        Computed::new()
    }
}

impl<S: ModelSchema> Clone for Computed<S> {
    fn clone(&self) -> Self {
        Computed {
            table: self.table.clone(),
        }
    }
}

impl<S: ModelSchema> fmt::Debug for Computed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut props: Vec<&str> = self.table.keys().map(String::as_str).collect();
        props.sort_unstable();
        f.debug_struct("Computed").field("props", &props).finish()
    }
}
