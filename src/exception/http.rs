use crate::error::{RosterError, join_failures};
use crate::exception::{ErrorCode, ExceptionFilter, ProblemDetails};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::Level;

/// Translates every [`RosterError`] into a problem-details response.
///
/// Validation and server errors are logged at `error`, other client errors
/// at `warn`, all with the trace id that is returned to the caller.
#[derive(Clone, Copy, Default)]
pub struct ProblemDetailsFilter;

impl ProblemDetailsFilter {
    pub fn problem_for(&self, error: &RosterError) -> ProblemDetails {
        match error {
            RosterError::Validation(failures) => ProblemDetails::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationFailed,
                join_failures(failures),
            )
            .with_errors(failures.clone()),
            RosterError::BadRequest(message) => ProblemDetails::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::MalformedRequest,
                message.clone(),
            ),
            RosterError::NotFound { .. } => ProblemDetails::new(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                error.to_string(),
            ),
            RosterError::Cancelled => ProblemDetails::new(
                StatusCode::REQUEST_TIMEOUT,
                ErrorCode::RequestCancelled,
                error.to_string(),
            ),
            RosterError::HandlerNotRegistered { .. }
            | RosterError::DependencyNotFound { .. }
            | RosterError::DowncastFailed { .. }
            | RosterError::IdSpaceExhausted { .. }
            | RosterError::Config(_) => ProblemDetails::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "An unexpected error occurred",
            ),
        }
    }

    pub fn log_level(&self, error: &RosterError, problem: &ProblemDetails) -> Level {
        match error {
            RosterError::Validation(_) => Level::ERROR,
            _ if problem.status.is_server_error() => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

impl ExceptionFilter for ProblemDetailsFilter {
    fn catch(&self, error: RosterError) -> Response {
        let problem = self.problem_for(&error);

        if self.log_level(&error, &problem) == Level::ERROR {
            tracing::error!(trace_id = %problem.trace_id, code = %problem.code, error = ?error, "Exception:\n{}", error);
        } else {
            tracing::warn!(trace_id = %problem.trace_id, code = %problem.code, "{}", error);
        }

        problem.into_response()
    }
}
