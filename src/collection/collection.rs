use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::model::{Model, ModelSchema};
use crate::params::QueryParams;
use crate::props::Props;
use crate::proxy::{DataProxy, ProxyError};

use super::Pushable;

/// Options for [`Collection::query`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOpts {
    /// Keep the current contents and append the results.
    pub append: bool,
}

impl QueryOpts {
    /// Options that append instead of replacing.
    pub fn append() -> Self {
        QueryOpts { append: true }
    }
}

/// An ordered, mutable sequence of models of one schema.
///
/// Insertion order is significant and never reordered by the collection.
/// Membership checks and removal go by instance identity (the tag models
/// carry from construction), not by value equality. `query` fills the
/// collection from the adapter; everything else is list plumbing.
pub struct Collection<S: ModelSchema> {
    models: Vec<Model<S>>,
    params: QueryParams,
    proxy: Option<Arc<dyn DataProxy<S>>>,
}

impl<S: ModelSchema> Collection<S> {
    /// New empty collection.
    pub fn new() -> Self {
        Collection {
            models: Vec::new(),
            params: QueryParams::new(),
            proxy: None,
        }
    }

    /// Append models in order and return the new length.
    ///
    /// Accepts a model, a plain property map (constructed through
    /// [`Model::create`], so defaults and mutations apply), or a `Vec`/array
    /// of either.
    pub fn push(&mut self, items: impl Pushable<S>) -> usize {
        self.models.extend(items.into_models());
        self.models.len()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Live view of the backing sequence.
    pub fn models(&self) -> &[Model<S>] {
        &self.models
    }

    /// Mutable view of the backing sequence. Length changes still go
    /// through [`push`](Collection::push)/[`remove`](Collection::remove).
    pub fn models_mut(&mut self) -> &mut [Model<S>] {
        &mut self.models
    }

    /// Detached copy of the contents.
    pub fn to_vec(&self) -> Vec<Model<S>> {
        self.models.clone()
    }

    pub fn first(&self) -> Option<&Model<S>> {
        self.models.first()
    }

    pub fn last(&self) -> Option<&Model<S>> {
        self.models.last()
    }

    /// Model at `index`, or `None` out of range.
    pub fn at(&self, index: usize) -> Option<&Model<S>> {
        self.models.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Model<S>> {
        self.models.get_mut(index)
    }

    /// Remove `model` by identity. Answers whether anything was removed;
    /// absent models are a silent no-op.
    pub fn remove(&mut self, model: &Model<S>) -> bool {
        match self.models.iter().position(|m| m.uid() == model.uid()) {
            Some(index) => {
                self.models.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return the model at `index`; `None` out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Model<S>> {
        if index < self.models.len() {
            Some(self.models.remove(index))
        } else {
            None
        }
    }

    /// Empty the backing sequence in place.
    pub fn clear(&mut self) {
        self.models.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model<S>> {
        self.models.iter()
    }

    /// First model matching `predicate(model, index)`.
    pub fn find<F>(&self, mut predicate: F) -> Option<&Model<S>>
    where
        F: FnMut(&Model<S>, usize) -> bool,
    {
        self.models
            .iter()
            .enumerate()
            .find(|(index, model)| predicate(model, *index))
            .map(|(_, model)| model)
    }

    /// In-order traversal over `(model, index)`.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&Model<S>, usize),
    {
        for (index, model) in self.models.iter().enumerate() {
            f(model, index);
        }
    }

    /// In-order transform over `(model, index)`.
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&Model<S>, usize) -> T,
    {
        self.models
            .iter()
            .enumerate()
            .map(|(index, model)| f(model, index))
            .collect()
    }

    /// Models matching `predicate(model, index)`, original order.
    pub fn filter<F>(&self, mut predicate: F) -> Vec<&Model<S>>
    where
        F: FnMut(&Model<S>, usize) -> bool,
    {
        self.models
            .iter()
            .enumerate()
            .filter(|(index, model)| predicate(model, *index))
            .map(|(_, model)| model)
            .collect()
    }

    /// Membership by identity.
    pub fn contains(&self, model: &Model<S>) -> bool {
        self.models.iter().any(|m| m.uid() == model.uid())
    }

    /// Membership by predicate, with [`find`](Collection::find)'s semantics.
    pub fn contains_by<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Model<S>, usize) -> bool,
    {
        self.find(predicate).is_some()
    }

    /// Contained models with uncommitted changes, original order.
    pub fn dirty_models(&self) -> Vec<&Model<S>> {
        self.models.iter().filter(|m| m.is_dirty()).collect()
    }

    /// The bound schema's logical type name.
    pub fn model_class_name(&self) -> String {
        S::class_name()
    }

    /// Proxy serving this collection: the injected handle when one was set,
    /// otherwise the schema default.
    pub fn data_proxy(&self) -> Arc<dyn DataProxy<S>> {
        match &self.proxy {
            Some(proxy) => Arc::clone(proxy),
            None => S::data_proxy(),
        }
    }

    pub fn set_data_proxy(&mut self, proxy: Arc<dyn DataProxy<S>>) {
        self.proxy = Some(proxy);
    }

    /// Read-only view of the permanent query parameters.
    pub fn query_params(&self) -> &Props {
        self.params.snapshot()
    }

    pub fn set_query_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.set(key, value);
    }

    pub fn set_query_params(&mut self, patch: Props) {
        self.params.set_many(patch);
    }

    pub fn remove_query_param(&mut self, key: &str) {
        self.params.remove(key);
    }

    /// Fill the collection from the adapter and return how many records
    /// arrived.
    ///
    /// Merges permanent parameters with `extra` (per-call wins) and hands
    /// the adapter the collection plus the merged map. Unless
    /// `opts.append`, current contents are cleared, and only after the
    /// adapter replied: on failure the collection is untouched. Every
    /// returned record is pushed through the normal pipeline and then
    /// marked persisted.
    pub async fn query(
        &mut self,
        extra: Option<Props>,
        opts: QueryOpts,
    ) -> Result<usize, ProxyError> {
        let params = self.params.merged(extra.as_ref());
        let proxy = self.data_proxy();
        let rows = proxy.query(&*self, &params).await?;
        if !opts.append {
            self.models.clear();
        }
        let added = rows.len();
        for row in rows {
            let mut model = Model::create(row);
            model.mark_persisted();
            self.models.push(model);
        }
        Ok(added)
    }
}

impl<S: ModelSchema> Default for Collection<S> {
    fn default() -> Self {
        Collection::new()
    }
}

impl<S: ModelSchema> Clone for Collection<S> {
    fn clone(&self) -> Self {
        Collection {
            models: self.models.clone(),
            params: self.params.clone(),
            proxy: self.proxy.clone(),
        }
    }
}

impl<S: ModelSchema> fmt::Debug for Collection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("class", &S::class_name())
            .field("len", &self.models.len())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<'a, S: ModelSchema> IntoIterator for &'a Collection<S> {
    type Item = &'a Model<S>;
    type IntoIter = std::slice::Iter<'a, Model<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl<S: ModelSchema> Serialize for Collection<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.models.iter())
    }
}
