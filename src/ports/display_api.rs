//! DisplayApi port - the request/response operations a display consumes.
//!
//! Displays fetch their eligible ads and their flight board over this port;
//! push events only tell them when to refetch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::advertisement::Advertisement;
use crate::domain::flight::{Flight, FlightType};
use crate::domain::foundation::{AdvertisementId, AirportCode};

/// Response of the active-advertisements query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAdvertisements {
    pub success: bool,
    #[serde(default)]
    pub advertisements: Vec<Advertisement>,
    /// When set, every display stops rotating ads whatever the list holds.
    #[serde(default)]
    pub emergency_mode: bool,
}

/// Response of the flight-board query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightList {
    pub success: bool,
    #[serde(default)]
    pub flights: Vec<Flight>,
}

/// Display API failures.
#[derive(Debug, Error)]
pub enum DisplayApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Server reported failure")]
    Rejected,
}

/// Port for the collaborator HTTP operations.
#[async_trait]
pub trait DisplayApi: Send + Sync {
    /// Eligible ads for an airport plus the emergency flag.
    async fn active_advertisements(
        &self,
        airport: &AirportCode,
    ) -> Result<ActiveAdvertisements, DisplayApiError>;

    /// Count one play of an ad. Callers don't wait on the outcome.
    async fn record_view(&self, id: &AdvertisementId) -> Result<(), DisplayApiError>;

    /// Flights listed on an airport's board.
    async fn flights(
        &self,
        airport: &AirportCode,
        flight_type: Option<FlightType>,
    ) -> Result<Vec<Flight>, DisplayApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_api_is_object_safe() {
        fn _accepts_dyn(_api: &dyn DisplayApi) {}
    }

    #[test]
    fn active_advertisements_tolerates_missing_fields() {
        let parsed: ActiveAdvertisements =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(parsed.advertisements.is_empty());
        assert!(!parsed.emergency_mode);
    }

    #[test]
    fn emergency_flag_uses_camel_case() {
        let parsed: ActiveAdvertisements =
            serde_json::from_str(r#"{"success": true, "advertisements": [], "emergencyMode": true}"#)
                .unwrap();
        assert!(parsed.emergency_mode);
    }
}
