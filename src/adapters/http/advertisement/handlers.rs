//! HTTP handlers for advertisement endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::application::handlers::{
    DeleteAdvertisementCommand, ListActiveAdvertisementsQuery, RecordAdvertisementViewCommand,
    SaveAdvertisementCommand, SetEmergencyModeCommand,
};
use crate::domain::advertisement::AdvertisementDraft;
use crate::domain::foundation::{AdvertisementId, AirportCode};
use crate::ports::ActiveAdvertisements;

use super::dto::{
    ActiveQuery, AdvertisementDeletedResponse, AdvertisementResponse, EmergencyRequest,
    EmergencyResponse, ViewRecordedResponse,
};
use crate::adapters::http::{command_metadata, ApiError, ApiState};

fn parse_advertisement_id(raw: &str) -> Result<AdvertisementId, ApiError> {
    raw.parse::<AdvertisementId>()
        .map_err(|_| ApiError::bad_request(format!("Invalid advertisement ID: {}", raw)))
}

/// GET /api/advertisements/active?airport=CDG
pub async fn list_active(
    State(state): State<ApiState>,
    Query(params): Query<ActiveQuery>,
) -> Result<Json<ActiveAdvertisements>, ApiError> {
    let airport = AirportCode::new(&params.airport)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let active = state
        .list_active_advertisements_handler()
        .handle(ListActiveAdvertisementsQuery { airport })
        .await?;
    Ok(Json(active))
}

/// POST /api/advertisements/:id/view
pub async fn record_view(
    State(state): State<ApiState>,
    Path(advertisement_id): Path<String>,
) -> Result<Json<ViewRecordedResponse>, ApiError> {
    let advertisement_id = parse_advertisement_id(&advertisement_id)?;

    let views = state
        .record_advertisement_view_handler()
        .handle(RecordAdvertisementViewCommand { advertisement_id })
        .await?;
    Ok(Json(ViewRecordedResponse {
        success: true,
        views,
    }))
}

/// PUT /api/advertisements
pub async fn save_advertisement(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(draft): Json<AdvertisementDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .save_advertisement_handler()
        .handle(SaveAdvertisementCommand { draft }, command_metadata(&headers))
        .await?;

    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(AdvertisementResponse {
            success: true,
            advertisement: result.advertisement,
            created: result.created,
        }),
    ))
}

/// DELETE /api/advertisements/:id
pub async fn delete_advertisement(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(advertisement_id): Path<String>,
) -> Result<Json<AdvertisementDeletedResponse>, ApiError> {
    let advertisement_id = parse_advertisement_id(&advertisement_id)?;

    state
        .delete_advertisement_handler()
        .handle(
            DeleteAdvertisementCommand { advertisement_id },
            command_metadata(&headers),
        )
        .await?;
    Ok(Json(AdvertisementDeletedResponse {
        success: true,
        advertisement_id,
    }))
}

/// PUT /api/advertisements/emergency
pub async fn set_emergency_mode(
    State(state): State<ApiState>,
    Json(req): Json<EmergencyRequest>,
) -> Result<Json<EmergencyResponse>, ApiError> {
    let previous = state
        .set_emergency_mode_handler()
        .handle(SetEmergencyModeCommand {
            enabled: req.enabled,
        })
        .await?;
    Ok(Json(EmergencyResponse {
        success: true,
        emergency_mode: req.enabled,
        previous,
    }))
}
