//! Routes for flight endpoints.

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers::{
    change_flight_status, delete_flight, list_flights, register_flight, update_flight_times,
};
use crate::adapters::http::ApiState;

/// Flight routes, mounted under `/api/flights`.
pub fn flight_routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(list_flights).post(register_flight))
        .route("/:id", patch(update_flight_times).delete(delete_flight))
        .route("/:id/status", patch(change_flight_status))
}
