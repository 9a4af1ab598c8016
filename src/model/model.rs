//! The model core: write pipeline, dirty state, lifecycle, persistence.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::params::QueryParams;
use crate::props::Props;
use crate::proxy::{DataProxy, ProxyError};

use super::{Computed, ModelSchema, Mutations};

/// Identity tags stand in for reference identity in collections: assigned at
/// construction, preserved by `clone`, never reused.
fn next_uid() -> u64 {
    static NEXT_UID: AtomicU64 = AtomicU64::new(1);
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

/// A change-tracked record of schema `S`.
///
/// Every external write runs one pipeline: capture the pre-write value into
/// the dirty snapshot (once per property per commit cycle), apply the
/// schema's mutation for the property, store the result. `commit` accepts
/// the current values as the new baseline; `rollback` restores the captured
/// ones raw. `load`/`save`/`destroy` delegate to the instance's
/// [`DataProxy`] and only touch lifecycle state after the proxy succeeds.
pub struct Model<S: ModelSchema> {
    uid: u64,
    fields: Props,
    snapshot: HashMap<String, Option<Value>>,
    rolling_back: bool,
    phantom: bool,
    destroyed: bool,
    params: QueryParams,
    proxy: Option<Arc<dyn DataProxy<S>>>,
    mutations: Mutations<S>,
    computed: Computed<S>,
    _schema: PhantomData<S>,
}

impl<S: ModelSchema> Model<S> {
    /// New instance carrying the schema's defaults: clean, phantom, not
    /// destroyed.
    pub fn new() -> Self {
        Model {
            uid: next_uid(),
            fields: S::defaults(),
            snapshot: HashMap::new(),
            rolling_back: false,
            phantom: true,
            destroyed: false,
            params: QueryParams::new(),
            proxy: None,
            mutations: S::mutations(),
            computed: S::computed(),
            _schema: PhantomData,
        }
    }

    /// Factory: a new instance with `data` applied through the write
    /// pipeline. Defaults are captured as pre-write values and mutations
    /// run, so the instance starts dirty exactly as if the caller had set
    /// every key by hand.
    pub fn create(data: Props) -> Self {
        let mut model = Model::new();
        model.set_props(data);
        model
    }

    /// Single write entry point, in order: skip computed names, capture the
    /// pre-write value once, apply the schema mutation unless rolling back,
    /// store.
    fn write_value(&mut self, name: String, raw: Value) {
        if self.computed.contains(&name) {
            return;
        }
        if !self.snapshot.contains_key(&name) {
            let previous = self.fields.get(&name).cloned();
            self.snapshot.insert(name.clone(), previous);
        }
        let transform = self.mutations.get(&name).map(Arc::clone);
        let value = if self.rolling_back {
            raw
        } else {
            match transform {
                Some(transform) => transform(&*self, raw),
                None => raw,
            }
        };
        self.fields.insert(name, value);
    }

    /// Write one property through the pipeline.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.write_value(key.into(), value.into());
    }

    /// Bulk write; every key runs through the same pipeline as [`set`].
    ///
    /// [`set`]: Model::set
    pub fn set_props(&mut self, patch: Props) {
        for (key, value) in patch {
            self.write_value(key, value);
        }
    }

    /// Stored field lookup. `None` marks an absent property, distinguishable
    /// from a stored null. Computed properties are not visible here; use
    /// [`read`](Model::read) or [`props`](Model::props) for those.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Full property read: computed accessors first (evaluated fresh), then
    /// stored fields, then absent.
    pub fn read(&self, key: &str) -> Option<Value> {
        if let Some(accessor) = self.computed.get(key) {
            return Some(accessor(self));
        }
        self.fields.get(key).cloned()
    }

    /// True while any property has been written since the last commit.
    pub fn is_dirty(&self) -> bool {
        !self.snapshot.is_empty()
    }

    /// True until the instance is confirmed persisted by a successful load
    /// or save; true again after a successful destroy.
    pub fn is_phantom(&self) -> bool {
        self.phantom
    }

    /// True only between a successful destroy and the next successful save.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Dirty property names paired with their current (post-write) values.
    pub fn dirty_props(&self) -> Props {
        let mut dirty = Props::new();
        for name in self.snapshot.keys() {
            if let Some(value) = self.fields.get(name) {
                dirty.insert(name.clone(), value.clone());
            }
        }
        dirty
    }

    /// Accept the current values as the new baseline, optionally applying
    /// `patch` through the write pipeline first.
    pub fn commit(&mut self, patch: Option<Props>) {
        if let Some(patch) = patch {
            self.set_props(patch);
        }
        self.snapshot.clear();
    }

    /// Restore every dirty property to its pre-write value and leave the
    /// instance clean.
    ///
    /// Restores bypass the mutation table: values come back exactly as
    /// captured. Properties that did not exist before their first write are
    /// removed again.
    pub fn rollback(&mut self) {
        self.rolling_back = true;
        let entries: Vec<(String, Option<Value>)> = self
            .snapshot
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        for (name, original) in entries {
            match original {
                Some(value) => self.write_value(name, value),
                None => {
                    self.fields.remove(&name);
                }
            }
        }
        self.snapshot.clear();
        self.rolling_back = false;
    }

    /// Every stored field plus every computed property, evaluated fresh.
    pub fn props(&self) -> Props {
        let mut props = self.fields.clone();
        for (name, accessor) in self.computed.iter() {
            props.insert(name.clone(), accessor(self));
        }
        props
    }

    /// The schema's logical type name.
    pub fn class_name(&self) -> String {
        S::class_name()
    }

    /// Proxy serving this instance: the injected handle when one was set,
    /// otherwise the schema default.
    pub fn data_proxy(&self) -> Arc<dyn DataProxy<S>> {
        match &self.proxy {
            Some(proxy) => Arc::clone(proxy),
            None => S::data_proxy(),
        }
    }

    /// Route this instance's proxy calls through `proxy` instead of the
    /// schema default.
    pub fn set_data_proxy(&mut self, proxy: Arc<dyn DataProxy<S>>) {
        self.proxy = Some(proxy);
    }

    /// Read-only view of the permanent query parameters.
    pub fn query_params(&self) -> &Props {
        self.params.snapshot()
    }

    /// Set one permanent query parameter.
    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.set(key, value);
    }

    /// Shallow-merge a patch of permanent query parameters.
    pub fn set_query_params(&mut self, patch: Props) {
        self.params.set_many(patch);
    }

    /// Remove one permanent query parameter. No-op when absent.
    pub fn remove_query_param(&mut self, key: &str) {
        self.params.remove(key);
    }

    /// Fetch the backend record through the proxy, apply any returned patch,
    /// commit, and mark the instance persisted.
    ///
    /// Proxy failures propagate unchanged and leave every piece of state as
    /// it was.
    pub async fn load(&mut self, extra: Option<Props>) -> Result<(), ProxyError> {
        let params = self.params.merged(extra.as_ref());
        let proxy = self.data_proxy();
        let patch = proxy.fetch(&*self, &params).await?;
        self.commit(patch);
        self.phantom = false;
        self.destroyed = false;
        Ok(())
    }

    /// Persist through the proxy: the create path while phantom, the update
    /// path otherwise. Applies any returned patch, commits, and marks the
    /// instance persisted (clearing `destroyed`).
    pub async fn save(&mut self, extra: Option<Props>) -> Result<(), ProxyError> {
        let params = self.params.merged(extra.as_ref());
        let proxy = self.data_proxy();
        let patch = if self.phantom {
            proxy.create(&*self, &params).await?
        } else {
            proxy.update(&*self, &params).await?
        };
        self.commit(patch);
        self.phantom = false;
        self.destroyed = false;
        Ok(())
    }

    /// Delete the backend record through the proxy. No-op without a proxy
    /// call while phantom. On success the instance is phantom again and
    /// flagged destroyed until the next successful save.
    pub async fn destroy(&mut self, extra: Option<Props>) -> Result<(), ProxyError> {
        if self.phantom {
            return Ok(());
        }
        let params = self.params.merged(extra.as_ref());
        let proxy = self.data_proxy();
        let patch = proxy.delete(&*self, &params).await?;
        self.commit(patch);
        self.phantom = true;
        self.destroyed = true;
        Ok(())
    }

    /// Flip the lifecycle to persisted without a proxy round trip. Used by
    /// collection queries, whose records arrive already persisted.
    pub(crate) fn mark_persisted(&mut self) {
        self.phantom = false;
        self.destroyed = false;
    }

    pub(crate) fn uid(&self) -> u64 {
        self.uid
    }
}

impl<S: ModelSchema> Default for Model<S> {
    fn default() -> Self {
        Model::new()
    }
}

impl<S: ModelSchema> Clone for Model<S> {
    fn clone(&self) -> Self {
        Model {
            uid: self.uid,
            fields: self.fields.clone(),
            snapshot: self.snapshot.clone(),
            rolling_back: self.rolling_back,
            phantom: self.phantom,
            destroyed: self.destroyed,
            params: self.params.clone(),
            proxy: self.proxy.clone(),
            mutations: self.mutations.clone(),
            computed: self.computed.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S: ModelSchema> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("uid", &self.uid)
            .field("fields", &self.fields)
            .field("snapshot", &self.snapshot)
            .field("phantom", &self.phantom)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<S: ModelSchema> Serialize for Model<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.props().serialize(serializer)
    }
}
