use crate::error::RosterError;
use axum::response::Response;

pub mod http;
pub mod problem;

pub use http::ProblemDetailsFilter;
pub use problem::{APPLICATION_PROBLEM_JSON, ErrorCode, ProblemDetails};

/// The ExceptionFilter trait
///
/// Filters turn an error that escaped request handling into a response.
/// They must always produce one: there is no fall-through.
pub trait ExceptionFilter: Send + Sync + 'static {
    fn catch(&self, error: RosterError) -> Response;
}
