use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

/// A single broken rule reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub property: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Joins failure messages with `;`, the delimiter used in problem details.
pub fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.message.as_str())
        .collect::<Vec<_>>()
        .join(";")
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Validation failed: {}", join_failures(.0))]
    Validation(Vec<ValidationFailure>),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("{entity} {id} was not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("No handler registered for {request}")]
    HandlerNotRegistered { request: &'static str },

    #[error("Dependency not found: {type_name}")]
    DependencyNotFound { type_name: String },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("No {entity} ids left to assign")]
    IdSpaceExhausted { entity: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RosterError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Failures carried by a validation error, empty for every other kind.
    pub fn failures(&self) -> &[ValidationFailure] {
        match self {
            Self::Validation(failures) => failures,
            _ => &[],
        }
    }
}

impl axum::response::IntoResponse for RosterError {
    fn into_response(self) -> axum::response::Response {
        use crate::exception::{ExceptionFilter, http::ProblemDetailsFilter};

        ProblemDetailsFilter.catch(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_joins_every_message() {
        let err = RosterError::Validation(vec![
            ValidationFailure::new("GivenNames", "'GivenNames' must not be empty."),
            ValidationFailure::new("Id", "User not exists"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: 'GivenNames' must not be empty.;User not exists"
        );
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = RosterError::not_found("User", 42);
        assert_eq!(err.to_string(), "User 42 was not found");
        assert!(err.failures().is_empty());
    }
}
