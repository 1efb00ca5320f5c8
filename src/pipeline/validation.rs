use crate::error::{Result, RosterError};
use crate::pipe::Validator;
use crate::pipeline::{Next, PipelineBehavior, Request};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs every validator for `R` before the handler.
///
/// Validators run concurrently. Their failures are concatenated in
/// validator order and, if any exist, the request is rejected with a single
/// [`RosterError::Validation`] holding all of them.
pub struct ValidationBehavior<R: Request> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R: Request> ValidationBehavior<R> {
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for ValidationBehavior<R> {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> Result<R::Response> {
        if !self.validators.is_empty() {
            let results = join_all(
                self.validators
                    .iter()
                    .map(|validator| validator.validate(&request, cancel)),
            )
            .await;

            let mut failures = Vec::new();
            for result in results {
                failures.extend(result?);
            }

            if !failures.is_empty() {
                tracing::debug!(
                    request = R::name(),
                    failures = failures.len(),
                    "Request rejected by validation"
                );
                return Err(RosterError::Validation(failures));
            }
        }

        next.run(request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use crate::pipeline::{Pipeline, RequestHandler};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    struct Ping;

    impl Request for Ping {
        type Response = ();
    }

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RequestHandler<Ping> for CountingHandler {
        async fn handle(&self, _request: Ping, _cancel: &CancellationToken) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Only completes once every validator sharing the barrier is running.
    struct Rendezvous {
        barrier: Arc<Barrier>,
        message: &'static str,
    }

    #[async_trait]
    impl Validator<Ping> for Rendezvous {
        async fn validate(
            &self,
            _request: &Ping,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ValidationFailure>> {
            self.barrier.wait().await;
            Ok(vec![ValidationFailure::new("P", self.message)])
        }
    }

    #[tokio::test]
    async fn validators_run_concurrently_and_report_in_order() {
        let barrier = Arc::new(Barrier::new(2));
        let validators: Vec<Arc<dyn Validator<Ping>>> = vec![
            Arc::new(Rendezvous {
                barrier: barrier.clone(),
                message: "a",
            }),
            Arc::new(Rendezvous {
                barrier,
                message: "b",
            }),
        ];
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(CountingHandler {
            calls: calls.clone(),
        })
        .with_behavior(ValidationBehavior::new(validators));

        let cancel = CancellationToken::new();
        let result = tokio::time::timeout(Duration::from_secs(2), pipeline.run(Ping, &cancel))
            .await
            .expect("validators ran one after another");

        match result {
            Err(RosterError::Validation(failures)) => assert_eq!(
                failures,
                [ValidationFailure::new("P", "a"), ValidationFailure::new("P", "b")]
            ),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
