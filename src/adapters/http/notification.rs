//! `POST /api/notifications` - reference-data mutations reported by the admin.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::NotifyReferenceChangeCommand;
use crate::domain::foundation::{AirportCode, EventId};
use crate::domain::reference::ReferenceAction;

use super::{command_metadata, ApiError, ApiState};

/// `{"entity": "airport", "action": "updated", "code": "CDG", "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "entity", rename_all = "lowercase")]
pub enum NotificationRequest {
    Airport {
        action: ReferenceAction,
        code: String,
        #[serde(default)]
        data: Value,
    },
    Airline {
        action: ReferenceAction,
        code: String,
        #[serde(default)]
        data: Value,
    },
}

impl NotificationRequest {
    fn into_command(self) -> Result<NotifyReferenceChangeCommand, ApiError> {
        match self {
            NotificationRequest::Airport { action, code, data } => {
                let code =
                    AirportCode::new(&code).map_err(|e| ApiError::bad_request(e.to_string()))?;
                Ok(NotifyReferenceChangeCommand::Airport { action, code, data })
            }
            NotificationRequest::Airline { action, code, data } => {
                Ok(NotifyReferenceChangeCommand::Airline { action, code, data })
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub success: bool,
    pub event_id: EventId,
    pub event_type: String,
}

pub async fn notify(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<NotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let envelope = state
        .notify_reference_change_handler()
        .handle(req.into_command()?, command_metadata(&headers))
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(NotificationResponse {
            success: true,
            event_id: envelope.event_id,
            event_type: envelope.event_type,
        }),
    ))
}

pub fn notification_routes() -> Router<ApiState> {
    Router::new().route("/", post(notify))
}
