use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Collection;
use crate::model::{Model, ModelSchema};
use crate::props::Props;

use super::{DataProxy, ProxyError};

/// In-memory backend for tests and prototyping.
///
/// Records live in one ordered map keyed `"Class:id"`, so a single proxy
/// can serve several schemas and queries come back in a stable order.
/// Records without an `id` get a sequential one on create, returned to the
/// model as a patch. Clones share the same store.
#[derive(Clone)]
pub struct MemoryProxy {
    records: Arc<RwLock<BTreeMap<String, Props>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for MemoryProxy {
    fn default() -> Self {
        MemoryProxy::new()
    }
}

impl MemoryProxy {
    pub fn new() -> Self {
        MemoryProxy {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Insert a record directly, bypassing the model pipeline.
    pub fn seed<S: ModelSchema>(&self, id: impl Into<Value>, props: Props) -> Result<(), ProxyError> {
        let id = id.into();
        let mut props = props;
        props.insert("id".to_string(), id.clone());
        let mut records = self
            .records
            .write()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        records.insert(record_key(&S::class_name(), &id), props);
        Ok(())
    }

    /// Stored record for `id`, if any. For assertions.
    pub fn record<S: ModelSchema>(&self, id: impl Into<Value>) -> Result<Option<Props>, ProxyError> {
        let records = self
            .records
            .read()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        Ok(records.get(&record_key(&S::class_name(), &id.into())).cloned())
    }

    /// Total records in the store, across every schema.
    pub fn len(&self) -> Result<usize, ProxyError> {
        let records = self
            .records
            .read()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, ProxyError> {
        Ok(self.len()? == 0)
    }

    fn key_for<S: ModelSchema>(&self, model: &Model<S>) -> Result<String, ProxyError> {
        let id = model
            .get("id")
            .filter(|id| !id.is_null())
            .ok_or_else(|| ProxyError::new(format!("{} record has no id", S::class_name())))?;
        Ok(record_key(&S::class_name(), id))
    }
}

fn record_key(class: &str, id: &Value) -> String {
    match id {
        Value::String(s) => format!("{}:{}", class, s),
        other => format!("{}:{}", class, other),
    }
}

fn matches(record: &Props, params: &Props) -> bool {
    params
        .iter()
        .all(|(key, value)| record.get(key) == Some(value))
}

#[async_trait]
impl<S: ModelSchema> DataProxy<S> for MemoryProxy {
    async fn fetch(&self, model: &Model<S>, _params: &Props) -> Result<Option<Props>, ProxyError> {
        let key = self.key_for(model)?;
        let records = self
            .records
            .read()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        match records.get(&key) {
            Some(record) => Ok(Some(record.clone())),
            None => Err(ProxyError::new(format!("{} not found", key))),
        }
    }

    async fn create(&self, model: &Model<S>, _params: &Props) -> Result<Option<Props>, ProxyError> {
        let mut record = model.props();
        let assigned = match record.get("id").filter(|id| !id.is_null()) {
            Some(id) => id.clone(),
            None => Value::from(self.next_id.fetch_add(1, Ordering::Relaxed)),
        };
        record.insert("id".to_string(), assigned.clone());
        let key = record_key(&S::class_name(), &assigned);

        let mut records = self
            .records
            .write()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        if records.contains_key(&key) {
            return Err(ProxyError::new(format!("{} already exists", key)));
        }
        records.insert(key, record);

        let mut patch = Props::new();
        patch.insert("id".to_string(), assigned);
        Ok(Some(patch))
    }

    async fn update(&self, model: &Model<S>, _params: &Props) -> Result<Option<Props>, ProxyError> {
        let key = self.key_for(model)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        if !records.contains_key(&key) {
            return Err(ProxyError::new(format!("{} not found", key)));
        }
        records.insert(key, model.props());
        Ok(None)
    }

    async fn delete(&self, model: &Model<S>, _params: &Props) -> Result<Option<Props>, ProxyError> {
        let key = self.key_for(model)?;
        let mut records = self
            .records
            .write()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        records.remove(&key);
        Ok(None)
    }

    async fn query(
        &self,
        _collection: &Collection<S>,
        params: &Props,
    ) -> Result<Vec<Props>, ProxyError> {
        let prefix = format!("{}:", S::class_name());
        let records = self
            .records
            .read()
            .map_err(|_| ProxyError::new("memory proxy lock poisoned"))?;
        Ok(records
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .filter(|(_, record)| matches(record, params))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
