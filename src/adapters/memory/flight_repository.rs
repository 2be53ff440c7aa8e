//! In-memory flight store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::flight::{Flight, FlightStatus, FlightType};
use crate::domain::foundation::{AirportCode, DomainError, FlightId};
use crate::ports::FlightRepository;

#[derive(Default)]
struct Store {
    flights: HashMap<FlightId, Flight>,
    /// Registration order.
    order: Vec<FlightId>,
}

/// In-memory storage for flight records
#[derive(Clone, Default)]
pub struct InMemoryFlightRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored flights
    pub async fn count(&self) -> usize {
        self.store.read().await.flights.len()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn save(&self, flight: &Flight) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.flights.insert(flight.id(), flight.clone()).is_none() {
            store.order.push(flight.id());
        }
        Ok(())
    }

    async fn save_if_status(
        &self,
        flight: &Flight,
        expected: FlightStatus,
    ) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        match store.flights.get_mut(&flight.id()) {
            Some(stored) if stored.status() == expected => {
                *stored = flight.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_id(&self, id: &FlightId) -> Result<Option<Flight>, DomainError> {
        Ok(self.store.read().await.flights.get(id).cloned())
    }

    async fn find_by_airport(
        &self,
        airport: &AirportCode,
        flight_type: Option<FlightType>,
    ) -> Result<Vec<Flight>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .order
            .iter()
            .filter_map(|id| store.flights.get(id))
            .filter(|flight| flight.is_listed_at(airport, flight_type))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &FlightId) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.flights.remove(id).is_some() {
            store.order.retain(|existing| existing != id);
        }
        Ok(())
    }
}
