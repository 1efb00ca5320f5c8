//! Request mediation.
//!
//! Every command or query is a [`Request`] dispatched through the
//! [`Mediator`]. The mediator runs the request through its registered
//! [`PipelineBehavior`]s, outermost first, before the [`RequestHandler`]:
//!
//! ```text
//! Mediator::send
//!   -> LoggingBehavior      (timing, outcome)
//!   -> ValidationBehavior   (all validators, aggregated failures)
//!   -> RequestHandler       (use case)
//! ```

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod logging;
pub mod mediator;
pub mod validation;

pub use logging::LoggingBehavior;
pub use mediator::{Mediator, Pipeline};
pub use validation::ValidationBehavior;

/// A command or query with a known response type.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;

    /// Short name used in logs.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Request")
    }
}

/// Executes one use case.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: R, cancel: &CancellationToken) -> Result<R::Response>;
}

/// A cross-cutting step wrapped around a handler.
///
/// A behavior either short-circuits with its own result or calls
/// [`Next::run`] to continue down the pipeline.
///
/// # Example
/// ```rust,ignore
/// struct AuditBehavior;
///
/// #[async_trait]
/// impl<R: Request> PipelineBehavior<R> for AuditBehavior {
///     async fn handle(&self, request: R, cancel: &CancellationToken, next: Next<'_, R>) -> Result<R::Response> {
///         tracing::info!(request = R::name(), "audit");
///         next.run(request, cancel).await
///     }
/// }
/// ```
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync + 'static {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response>;
}

/// The remainder of a pipeline: the behaviors not yet run, then the handler.
pub struct Next<'a, R: Request> {
    behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
    handler: &'a dyn RequestHandler<R>,
}

impl<'a, R: Request> Next<'a, R> {
    pub(crate) fn new(
        behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
        handler: &'a dyn RequestHandler<R>,
    ) -> Self {
        Self { behaviors, handler }
    }

    /// Execute the rest of the pipeline
    pub async fn run(self, request: R, cancel: &CancellationToken) -> Result<R::Response> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(request, cancel, Next::new(rest, self.handler))
                    .await
            }
            None => self.handler.handle(request, cancel).await,
        }
    }
}
