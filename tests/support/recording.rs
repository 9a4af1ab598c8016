//! A proxy that records every call for adapter-path assertions.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use modelkit::{async_trait, Collection, DataProxy, Model, ModelSchema, Props, ProxyError};

/// Counts calls per operation, remembers the last merged parameter map, and
/// answers with whatever patches/rows the test configured. `failing` makes
/// every operation report the given message instead.
#[derive(Default)]
pub struct RecordingProxy {
    fetches: AtomicUsize,
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    queries: AtomicUsize,
    last_params: Mutex<Option<Props>>,
    fetch_patch: Mutex<Option<Props>>,
    save_patch: Mutex<Option<Props>>,
    rows: Mutex<Vec<Props>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingProxy {
    pub fn new() -> Self {
        RecordingProxy::default()
    }

    pub fn with_fetch_patch(self, patch: Props) -> Self {
        *self.fetch_patch.lock().unwrap() = Some(patch);
        self
    }

    pub fn with_save_patch(self, patch: Props) -> Self {
        *self.save_patch.lock().unwrap() = Some(patch);
        self
    }

    pub fn with_rows(self, rows: Vec<Props>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    pub fn failing(self, message: &str) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::Relaxed)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Relaxed)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::Relaxed)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn total_calls(&self) -> usize {
        self.fetch_count()
            + self.create_count()
            + self.update_count()
            + self.delete_count()
            + self.query_count()
    }

    /// Merged parameter map the last operation received.
    pub fn last_params(&self) -> Option<Props> {
        self.last_params.lock().unwrap().clone()
    }

    fn record(&self, counter: &AtomicUsize, params: &Props) -> Result<(), ProxyError> {
        counter.fetch_add(1, Ordering::Relaxed);
        *self.last_params.lock().unwrap() = Some(params.clone());
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(ProxyError::new(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S: ModelSchema> DataProxy<S> for RecordingProxy {
    async fn fetch(&self, _model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError> {
        self.record(&self.fetches, params)?;
        Ok(self.fetch_patch.lock().unwrap().clone())
    }

    async fn create(&self, _model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError> {
        self.record(&self.creates, params)?;
        Ok(self.save_patch.lock().unwrap().clone())
    }

    async fn update(&self, _model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError> {
        self.record(&self.updates, params)?;
        Ok(self.save_patch.lock().unwrap().clone())
    }

    async fn delete(&self, _model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError> {
        self.record(&self.deletes, params)?;
        Ok(None)
    }

    async fn query(
        &self,
        _collection: &Collection<S>,
        params: &Props,
    ) -> Result<Vec<Props>, ProxyError> {
        self.record(&self.queries, params)?;
        Ok(self.rows.lock().unwrap().clone())
    }
}
