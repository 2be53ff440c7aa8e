//! Flight repository port.
//!
//! Flight records are owned by the admin collaborator; this contract is the
//! narrow slice the realtime core reads and writes.

use async_trait::async_trait;

use crate::domain::flight::{Flight, FlightStatus, FlightType};
use crate::domain::foundation::{AirportCode, DomainError, FlightId};

/// Repository port for Flight aggregate persistence.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// Insert or replace a flight record.
    async fn save(&self, flight: &Flight) -> Result<(), DomainError>;

    /// Replace a record only if its stored status is still `expected`.
    ///
    /// Returns `false`, storing nothing, when the status moved on or the
    /// record is gone. The check and the write are one atomic step.
    async fn save_if_status(
        &self,
        flight: &Flight,
        expected: FlightStatus,
    ) -> Result<bool, DomainError>;

    /// Find a flight by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &FlightId) -> Result<Option<Flight>, DomainError>;

    /// Records listed on an airport's board, optionally restricted to one type.
    ///
    /// Returned in registration order; board ordering is the visibility
    /// filter's job.
    async fn find_by_airport(
        &self,
        airport: &AirportCode,
        flight_type: Option<FlightType>,
    ) -> Result<Vec<Flight>, DomainError>;

    /// Remove a flight record. Removing an unknown id is a no-op.
    async fn delete(&self, id: &FlightId) -> Result<(), DomainError>;
}
