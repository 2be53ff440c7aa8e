//! Display-side flight board: fetch, filter, keep the last good list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::flight::{visible_flights, Flight, FlightType};
use crate::domain::foundation::{AirportCode, Timestamp};
use crate::ports::DisplayApi;

/// The flights one display currently shows.
///
/// A failed refresh keeps the previous list on screen.
pub struct FlightBoard {
    api: Arc<dyn DisplayApi>,
    airport: AirportCode,
    flight_type: Option<FlightType>,
    flights: Mutex<Vec<Flight>>,
}

impl FlightBoard {
    pub fn new(api: Arc<dyn DisplayApi>, airport: AirportCode) -> Self {
        Self {
            api,
            airport,
            flight_type: None,
            flights: Mutex::new(Vec::new()),
        }
    }

    /// Restrict the board to departures or arrivals.
    pub fn with_flight_type(mut self, flight_type: FlightType) -> Self {
        self.flight_type = Some(flight_type);
        self
    }

    /// Refetch and re-filter. Returns whether the board was replaced.
    pub async fn refresh(&self) -> bool {
        match self.api.flights(&self.airport, self.flight_type).await {
            Ok(fetched) => {
                let visible = visible_flights(&fetched, Timestamp::now());
                tracing::debug!(
                    airport = %self.airport,
                    fetched = fetched.len(),
                    visible = visible.len(),
                    "Flight board refreshed"
                );
                *self.lock() = visible;
                true
            }
            Err(e) => {
                tracing::warn!(airport = %self.airport, error = %e, "Flight board refresh failed");
                false
            }
        }
    }

    pub fn flights(&self) -> Vec<Flight> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Flight>> {
        self.flights.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
