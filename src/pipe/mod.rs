//! Request validation.
//!
//! A [`Validator`] inspects a request before its handler runs and reports
//! every broken rule at once. Most validators are [`RuleSet`]s assembled from
//! the declarative rules in [`rules`].

use crate::error::{Result, ValidationFailure};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub mod rules;

pub use rules::{Rule, RuleSet};

/// Checks a request of type `R`.
///
/// `Ok(vec![])` means the request is valid. An `Err` is reserved for checks
/// that could not run at all, for example an existence lookup whose storage
/// call was cancelled.
#[async_trait]
pub trait Validator<R>: Send + Sync + 'static
where
    R: Send + Sync,
{
    async fn validate(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidationFailure>>;
}
