use crate::error::{Result, ValidationFailure};
use crate::pipe::Validator;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, join_all};
use std::fmt::Display;
use std::future::Future;
use tokio_util::sync::CancellationToken;

type SyncCheck<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;
type AsyncCheck<R> = Box<dyn Fn(&R, CancellationToken) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

enum Check<R> {
    Sync(SyncCheck<R>),
    Async(AsyncCheck<R>),
}

/// One named predicate over a request, with the message reported when it fails.
pub struct Rule<R> {
    property: &'static str,
    message: String,
    check: Check<R>,
}

impl<R> Rule<R> {
    /// Replace the default failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn failure(&self) -> ValidationFailure {
        ValidationFailure::new(self.property, self.message.clone())
    }
}

/// Fails when the projected string is empty or whitespace only.
pub fn not_empty<R: 'static>(property: &'static str, project: fn(&R) -> &str) -> Rule<R> {
    Rule {
        property,
        message: format!("'{property}' must not be empty."),
        check: Check::Sync(Box::new(move |request: &R| !project(request).trim().is_empty())),
    }
}

/// Fails when the projected value equals its type's default, e.g. an id of `0`.
pub fn not_default<R, T>(property: &'static str, project: fn(&R) -> T) -> Rule<R>
where
    R: 'static,
    T: Default + PartialEq + 'static,
{
    Rule {
        property,
        message: format!("'{property}' must not be empty."),
        check: Check::Sync(Box::new(move |request: &R| project(request) != T::default())),
    }
}

/// Fails unless the projected value is strictly greater than `threshold`.
pub fn greater_than<R, T>(property: &'static str, project: fn(&R) -> T, threshold: T) -> Rule<R>
where
    R: 'static,
    T: PartialOrd + Display + Send + Sync + 'static,
{
    Rule {
        property,
        message: format!("'{property}' must be greater than '{threshold}'."),
        check: Check::Sync(Box::new(move |request: &R| project(request) > threshold)),
    }
}

/// Fails when `predicate` returns false.
pub fn must<R, F>(property: &'static str, message: impl Into<String>, predicate: F) -> Rule<R>
where
    F: Fn(&R) -> bool + Send + Sync + 'static,
{
    Rule {
        property,
        message: message.into(),
        check: Check::Sync(Box::new(predicate)),
    }
}

/// Fails when the asynchronous `predicate`, given the projected value,
/// resolves to false. Errors from the predicate abort validation.
pub fn must_async<R, T, P, F, Fut>(
    property: &'static str,
    message: impl Into<String>,
    project: P,
    predicate: F,
) -> Rule<R>
where
    P: Fn(&R) -> T + Send + Sync + 'static,
    F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    Rule {
        property,
        message: message.into(),
        check: Check::Async(Box::new(move |request: &R, cancel: CancellationToken| {
            predicate(project(request), cancel).boxed()
        })),
    }
}

/// An ordered, declarative list of rules for one request type.
pub struct RuleSet<R> {
    rules: Vec<Rule<R>>,
}

impl<R> RuleSet<R> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rule(mut self, rule: Rule<R>) -> Self {
        self.rules.push(rule);
        self
    }
}

impl<R> Default for RuleSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> Validator<R> for RuleSet<R>
where
    R: Send + Sync + 'static,
{
    async fn validate(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidationFailure>> {
        // Async checks are started together, results are reported in declaration order.
        let pending = self.rules.iter().map(|rule| match &rule.check {
            Check::Sync(check) => futures::future::ready(Ok(check(request))).boxed(),
            Check::Async(check) => check(request, cancel.clone()),
        });
        let outcomes = join_all(pending).await;

        let mut failures = Vec::new();
        for (rule, outcome) in self.rules.iter().zip(outcomes) {
            if !outcome? {
                failures.push(rule.failure());
            }
        }
        Ok(failures)
    }
}
