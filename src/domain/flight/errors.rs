//! Flight-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, FlightId, TransitionError};

use super::FlightStatus;

/// Flight-specific errors.
///
/// `SameState` and `InvalidTransition` are distinct kinds so callers can
/// tell a redundant request from a forbidden one. Neither mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlightError {
    #[error("Flight not found: {0}")]
    NotFound(FlightId),

    #[error("Flight is already {0}")]
    SameState(FlightStatus),

    #[error("Cannot change flight status from {from} to {to}")]
    InvalidTransition { from: FlightStatus, to: FlightStatus },

    #[error("Flight {0} was changed by another request")]
    Conflict(FlightId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl FlightError {
    pub fn not_found(id: FlightId) -> Self {
        FlightError::NotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FlightError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        FlightError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FlightError::NotFound(_) => ErrorCode::FlightNotFound,
            FlightError::SameState(_) => ErrorCode::SameState,
            FlightError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            FlightError::Conflict(_) => ErrorCode::ConcurrentModification,
            FlightError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            FlightError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<TransitionError<FlightStatus>> for FlightError {
    fn from(err: TransitionError<FlightStatus>) -> Self {
        match err {
            TransitionError::SameState(status) => FlightError::SameState(status),
            TransitionError::InvalidTransition { from, to } => {
                FlightError::InvalidTransition { from, to }
            }
        }
    }
}

impl From<DomainError> for FlightError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => FlightError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            _ => FlightError::Infrastructure(err.to_string()),
        }
    }
}
