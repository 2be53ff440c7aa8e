//! Error body and status mapping shared by every API route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::flight::FlightError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// Failure of an API handler, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path or query input, rejected before any handler runs.
    BadRequest(String),
    Flight(FlightError),
    Domain(DomainError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status(code: &ErrorCode) -> StatusCode {
        match code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::FlightNotFound | ErrorCode::AdvertisementNotFound => StatusCode::NOT_FOUND,
            ErrorCode::SameState
            | ErrorCode::InvalidStateTransition
            | ErrorCode::ConcurrentModification => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FlightError> for ApiError {
    fn from(err: FlightError) -> Self {
        ApiError::Flight(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(message))
            }
            ApiError::Flight(err) => {
                let code = err.code();
                (
                    Self::status(&code),
                    ErrorResponse::new(code.to_string(), err.to_string()),
                )
            }
            ApiError::Domain(err) => (
                Self::status(&err.code),
                ErrorResponse::new(err.code.to_string(), err.message),
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = %body.code, message = %body.message, "API request failed");
        } else {
            tracing::debug!(code = %body.code, message = %body.message, "API request rejected");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::FlightStatus;
    use crate::domain::foundation::FlightId;

    #[test]
    fn flight_errors_map_to_expected_statuses() {
        let cases = [
            (FlightError::not_found(FlightId::new()), StatusCode::NOT_FOUND),
            (
                FlightError::SameState(FlightStatus::Boarding),
                StatusCode::CONFLICT,
            ),
            (
                FlightError::InvalidTransition {
                    from: FlightStatus::Departed,
                    to: FlightStatus::Boarding,
                },
                StatusCode::CONFLICT,
            ),
            (FlightError::Conflict(FlightId::new()), StatusCode::CONFLICT),
            (
                FlightError::validation("times", "empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                FlightError::infrastructure("disk"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn domain_not_found_is_404() {
        let err = DomainError::new(ErrorCode::AdvertisementNotFound, "gone");
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn bad_request_body_carries_code() {
        let body = ErrorResponse::bad_request("Invalid flight ID");
        assert_eq!(body.code, "BAD_REQUEST");
        assert_eq!(body.message, "Invalid flight ID");
    }
}
