use crate::error::Result;
use crate::pipeline::{Next, PipelineBehavior, Request};
use async_trait::async_trait;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Records when a request starts, when it ends, and how long it took,
/// whatever the outcome.
#[derive(Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl<R: Request> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response> {
        let name = R::name();
        let start = Instant::now();
        tracing::info!(request = name, "Handling {}", name);

        let result = next.run(request, cancel).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(
                request = name,
                elapsed_ms,
                "Handled {}; Execution time = {}ms",
                name,
                elapsed_ms
            ),
            Err(e) => tracing::info!(
                request = name,
                elapsed_ms,
                error = %e,
                "Handled {} with error; Execution time = {}ms",
                name,
                elapsed_ms
            ),
        }
        result
    }
}
