//! ListFlightsHandler - the flight board query.

use std::sync::Arc;

use crate::domain::flight::{visible_flights, Flight, FlightError, FlightType};
use crate::domain::foundation::{AirportCode, Timestamp};
use crate::ports::FlightRepository;

#[derive(Debug, Clone)]
pub struct ListFlightsQuery {
    pub airport: AirportCode,
    pub flight_type: Option<FlightType>,
    /// Apply the board visibility filter and ordering.
    pub visible_only: bool,
}

pub struct ListFlightsHandler {
    repository: Arc<dyn FlightRepository>,
}

impl ListFlightsHandler {
    pub fn new(repository: Arc<dyn FlightRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListFlightsQuery) -> Result<Vec<Flight>, FlightError> {
        let flights = self
            .repository
            .find_by_airport(&query.airport, query.flight_type)
            .await?;
        if query.visible_only {
            Ok(visible_flights(&flights, Timestamp::now()))
        } else {
            Ok(flights)
        }
    }
}
