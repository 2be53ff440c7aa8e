//! Routes for advertisement endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    delete_advertisement, list_active, record_view, save_advertisement, set_emergency_mode,
};
use crate::adapters::http::ApiState;

/// Advertisement routes, mounted under `/api/advertisements`.
///
/// `/emergency` is a static segment and wins over `/:id`.
pub fn advertisement_routes() -> Router<ApiState> {
    Router::new()
        .route("/", put(save_advertisement))
        .route("/active", get(list_active))
        .route("/emergency", put(set_emergency_mode))
        .route("/:id", delete(delete_advertisement))
        .route("/:id/view", post(record_view))
}
