use crate::model::{Model, ModelSchema};
use crate::props::Props;

/// Argument conversion for [`Collection::push`](super::Collection::push).
///
/// Accepts a model, a plain property map (constructing a model of the bound
/// schema through the factory, so defaults and mutations apply), or
/// containers of either, processed in order.
pub trait Pushable<S: ModelSchema> {
    fn into_models(self) -> Vec<Model<S>>;
}

impl<S: ModelSchema> Pushable<S> for Model<S> {
    fn into_models(self) -> Vec<Model<S>> {
        vec![self]
    }
}

impl<S: ModelSchema> Pushable<S> for Props {
    fn into_models(self) -> Vec<Model<S>> {
        vec![Model::create(self)]
    }
}

impl<S: ModelSchema> Pushable<S> for Vec<Model<S>> {
    fn into_models(self) -> Vec<Model<S>> {
        self
    }
}

impl<S: ModelSchema> Pushable<S> for Vec<Props> {
    fn into_models(self) -> Vec<Model<S>> {
        self.into_iter().map(Model::create).collect()
    }
}

impl<S: ModelSchema, const N: usize> Pushable<S> for [Model<S>; N] {
    fn into_models(self) -> Vec<Model<S>> {
        self.into_iter().collect()
    }
}

impl<S: ModelSchema, const N: usize> Pushable<S> for [Props; N] {
    fn into_models(self) -> Vec<Model<S>> {
        self.into_iter().map(Model::create).collect()
    }
}
