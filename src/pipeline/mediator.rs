use crate::di::Container;
use crate::error::{Result, RosterError};
use crate::pipeline::{
    LoggingBehavior, Next, PipelineBehavior, Request, RequestHandler, ValidationBehavior,
};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The behaviors and handler serving one request type.
pub struct Pipeline<R: Request> {
    behaviors: Vec<Arc<dyn PipelineBehavior<R>>>,
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    /// A pipeline with no behaviors.
    pub fn new(handler: impl RequestHandler<R>) -> Self {
        Self {
            behaviors: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// The standard pipeline: logging outermost, then every validator the
    /// container holds for `R`, then the handler.
    pub fn standard(handler: impl RequestHandler<R>, container: &Container) -> Self {
        Self::new(handler)
            .with_behavior(LoggingBehavior)
            .with_behavior(ValidationBehavior::new(container.validators::<R>()))
    }

    /// Append a behavior; behaviors run in the order they were added.
    pub fn with_behavior(mut self, behavior: impl PipelineBehavior<R>) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    pub async fn run(&self, request: R, cancel: &CancellationToken) -> Result<R::Response> {
        Next::new(&self.behaviors, self.handler.as_ref())
            .run(request, cancel)
            .await
    }
}

/// Dispatches requests to the pipeline registered for their type.
///
/// Pipelines are registered explicitly; sending a request type nobody
/// registered fails with [`RosterError::HandlerNotRegistered`].
#[derive(Default)]
pub struct Mediator {
    pipelines: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Mediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` behind the standard pipeline.
    pub fn register<R: Request>(
        &self,
        handler: impl RequestHandler<R>,
        container: &Container,
    ) -> &Self {
        self.register_pipeline(Pipeline::standard(handler, container))
    }

    /// Register a fully assembled pipeline, replacing any previous one for `R`.
    pub fn register_pipeline<R: Request>(&self, pipeline: Pipeline<R>) -> &Self {
        self.pipelines.insert(TypeId::of::<R>(), Arc::new(pipeline));
        self
    }

    pub fn handles<R: Request>(&self) -> bool {
        self.pipelines.contains_key(&TypeId::of::<R>())
    }

    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response> {
        let pipeline = self.pipeline::<R>()?;
        pipeline.run(request, cancel).await
    }

    fn pipeline<R: Request>(&self) -> Result<Arc<Pipeline<R>>> {
        let erased = self
            .pipelines
            .get(&TypeId::of::<R>())
            .map(|entry| entry.value().clone())
            .ok_or(RosterError::HandlerNotRegistered {
                request: R::name(),
            })?;

        erased
            .downcast::<Pipeline<R>>()
            .map_err(|_| RosterError::DowncastFailed {
                type_name: std::any::type_name::<Pipeline<R>>().to_string(),
            })
    }
}
