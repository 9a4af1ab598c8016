use std::fmt;

use async_trait::async_trait;

use crate::collection::Collection;
use crate::model::{Model, ModelSchema};
use crate::props::Props;

/// Failure reported by a [`DataProxy`] operation.
///
/// The library passes these through verbatim. Adapters put whatever the
/// backend said into `message` and may attach the underlying driver error
/// as `source`.
#[derive(Debug)]
pub struct ProxyError {
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProxyError {
    pub fn new(message: impl Into<String>) -> Self {
        ProxyError {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a driver error, keeping it reachable through
    /// [`Error::source`](std::error::Error::source).
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ProxyError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proxy error: {}", self.message)
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Storage adapter for models of schema `S`.
///
/// The caller hands each operation the full model (or collection) plus the
/// already-merged query parameters; the adapter decides what to read from
/// them. An operation may return a property patch, applied to the model
/// before its dirty state is committed. Fetch and mutation results are the
/// adapter's business: returning `None` means "nothing to apply", not
/// "not found" (report that as an `Err`).
#[async_trait]
pub trait DataProxy<S: ModelSchema>: Send + Sync {
    /// Read the backend record for `model`.
    async fn fetch(&self, model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError>;

    /// Create the backend record for a phantom `model`.
    async fn create(&self, model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError>;

    /// Update the backend record for a persisted `model`.
    async fn update(&self, model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError>;

    /// Delete the backend record for a persisted `model`.
    async fn delete(&self, model: &Model<S>, params: &Props) -> Result<Option<Props>, ProxyError>;

    /// Fetch the property maps for every record matching `params`.
    async fn query(
        &self,
        collection: &Collection<S>,
        params: &Props,
    ) -> Result<Vec<Props>, ProxyError>;
}
