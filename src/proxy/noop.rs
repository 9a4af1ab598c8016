use async_trait::async_trait;

use crate::collection::Collection;
use crate::model::{Model, ModelSchema};
use crate::props::Props;

use super::{DataProxy, ProxyError};

/// Default proxy for schemas that never configured one. Every operation
/// succeeds and touches nothing, so lifecycle transitions still happen and
/// purely in-memory models keep working.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProxy;

#[async_trait]
impl<S: ModelSchema> DataProxy<S> for NoopProxy {
    async fn fetch(&self, _model: &Model<S>, _params: &Props) -> Result<Option<Props>, ProxyError> {
        Ok(None)
    }

    async fn create(
        &self,
        _model: &Model<S>,
        _params: &Props,
    ) -> Result<Option<Props>, ProxyError> {
        Ok(None)
    }

    async fn update(
        &self,
        _model: &Model<S>,
        _params: &Props,
    ) -> Result<Option<Props>, ProxyError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _model: &Model<S>,
        _params: &Props,
    ) -> Result<Option<Props>, ProxyError> {
        Ok(None)
    }

    async fn query(
        &self,
        _collection: &Collection<S>,
        _params: &Props,
    ) -> Result<Vec<Props>, ProxyError> {
        Ok(Vec::new())
    }
}
