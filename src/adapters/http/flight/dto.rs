//! Request and response bodies for flight endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::flight::{Flight, FlightStatus, FlightType};
use crate::domain::foundation::FlightId;

/// Query string of `GET /api/flights`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightsQuery {
    pub airport: String,
    #[serde(default, rename = "type")]
    pub flight_type: Option<FlightType>,
    /// Apply the board visibility filter server-side.
    #[serde(default)]
    pub visible: bool,
}

/// Body of `PATCH /api/flights/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: FlightStatus,
}

/// A flight after a command, with its counterpart when the command touched it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightResponse {
    pub success: bool,
    pub flight: Flight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<Flight>,
}

impl FlightResponse {
    pub fn new(flight: Flight, counterpart: Option<Flight>) -> Self {
        Self {
            success: true,
            flight,
            counterpart,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDeletedResponse {
    pub success: bool,
    pub flight_id: FlightId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_request_uses_kebab_case() {
        let req: ChangeStatusRequest =
            serde_json::from_str(r#"{"status":"in-flight"}"#).unwrap();
        assert_eq!(req.status, FlightStatus::InFlight);
    }
}
