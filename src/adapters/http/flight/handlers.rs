//! HTTP handlers for flight endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::application::handlers::{
    ChangeFlightStatusCommand, DeleteFlightCommand, ListFlightsQuery, RegisterFlightCommand,
    UpdateFlightTimesCommand,
};
use crate::domain::flight::{FlightTimesUpdate, NewFlight};
use crate::domain::foundation::{AirportCode, FlightId};
use crate::ports::FlightList;

use super::dto::{ChangeStatusRequest, FlightDeletedResponse, FlightResponse, FlightsQuery};
use crate::adapters::http::{command_metadata, ApiError, ApiState};

fn parse_flight_id(raw: &str) -> Result<FlightId, ApiError> {
    raw.parse::<FlightId>()
        .map_err(|_| ApiError::bad_request(format!("Invalid flight ID: {}", raw)))
}

/// GET /api/flights?airport=CDG&type=departure
pub async fn list_flights(
    State(state): State<ApiState>,
    Query(params): Query<FlightsQuery>,
) -> Result<Json<FlightList>, ApiError> {
    let airport = AirportCode::new(&params.airport)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let flights = state
        .list_flights_handler()
        .handle(ListFlightsQuery {
            airport,
            flight_type: params.flight_type,
            visible_only: params.visible,
        })
        .await?;

    Ok(Json(FlightList {
        success: true,
        flights,
    }))
}

/// POST /api/flights
pub async fn register_flight(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(flight): Json<NewFlight>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .register_flight_handler()
        .handle(RegisterFlightCommand { flight }, command_metadata(&headers))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FlightResponse::new(result.flight, result.counterpart)),
    ))
}

/// PATCH /api/flights/:id
pub async fn update_flight_times(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(flight_id): Path<String>,
    Json(times): Json<FlightTimesUpdate>,
) -> Result<Json<FlightResponse>, ApiError> {
    let flight_id = parse_flight_id(&flight_id)?;

    let flight = state
        .update_flight_times_handler()
        .handle(
            UpdateFlightTimesCommand { flight_id, times },
            command_metadata(&headers),
        )
        .await?;

    Ok(Json(FlightResponse::new(flight, None)))
}

/// PATCH /api/flights/:id/status
pub async fn change_flight_status(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(flight_id): Path<String>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<FlightResponse>, ApiError> {
    let flight_id = parse_flight_id(&flight_id)?;

    let result = state
        .change_flight_status_handler()
        .handle(
            ChangeFlightStatusCommand {
                flight_id,
                new_status: req.status,
            },
            command_metadata(&headers),
        )
        .await?;

    Ok(Json(FlightResponse::new(result.flight, result.counterpart)))
}

/// DELETE /api/flights/:id
pub async fn delete_flight(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(flight_id): Path<String>,
) -> Result<Json<FlightDeletedResponse>, ApiError> {
    let flight_id = parse_flight_id(&flight_id)?;

    state
        .delete_flight_handler()
        .handle(DeleteFlightCommand { flight_id }, command_metadata(&headers))
        .await?;

    Ok(Json(FlightDeletedResponse {
        success: true,
        flight_id,
    }))
}
