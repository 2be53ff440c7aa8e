//! HTTP adapters - the REST API served next to the realtime hub.
//!
//! Each resource has its own module with `dto`, `handlers` and `routes`.
//! [`api_router`] nests them under `/api`.

pub mod advertisement;
mod error;
pub mod flight;
pub mod notification;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::ApiState;

use axum::{http::HeaderMap, Router};

use crate::domain::foundation::CommandMetadata;

/// Header a caller may set to correlate its request with published events.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// All API routes under `/api`, ready to merge with the realtime router.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .nest("/api/flights", flight::flight_routes())
        .nest("/api/advertisements", advertisement::advertisement_routes())
        .nest("/api/notifications", notification::notification_routes())
        .with_state(state)
}

pub(crate) fn command_metadata(headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new().with_source("api");
    match headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(id) if !id.is_empty() => metadata.with_correlation_id(id),
        _ => metadata,
    }
}
