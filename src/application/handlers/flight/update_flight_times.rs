//! UpdateFlightTimesHandler - records estimated and actual times.

use std::sync::Arc;

use crate::domain::flight::{Flight, FlightError, FlightTimesUpdate};
use crate::domain::foundation::{CommandMetadata, FlightId, SerializableDomainEvent};
use crate::ports::{EventPublisher, FlightRepository};

#[derive(Debug, Clone)]
pub struct UpdateFlightTimesCommand {
    pub flight_id: FlightId,
    pub times: FlightTimesUpdate,
}

const MAX_ATTEMPTS: u32 = 3;

pub struct UpdateFlightTimesHandler {
    repository: Arc<dyn FlightRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateFlightTimesHandler {
    pub fn new(
        repository: Arc<dyn FlightRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateFlightTimesCommand,
        metadata: CommandMetadata,
    ) -> Result<Flight, FlightError> {
        if cmd.times.is_empty() {
            return Err(FlightError::validation("times", "No time to update"));
        }

        // A status change landing between load and save must not be undone.
        let mut committed = None;
        for _ in 0..MAX_ATTEMPTS {
            let mut flight = self
                .repository
                .find_by_id(&cmd.flight_id)
                .await?
                .ok_or_else(|| FlightError::not_found(cmd.flight_id))?;
            let status = flight.status();
            let event = flight.update_times(cmd.times.clone());
            if self.repository.save_if_status(&flight, status).await? {
                committed = Some((flight, event));
                break;
            }
        }
        let (flight, event) = committed.ok_or(FlightError::Conflict(cmd.flight_id))?;

        let envelope = event
            .to_envelope()?
            .with_correlation_id(metadata.correlation_id());
        self.event_publisher.publish(envelope).await?;

        tracing::debug!(flight_id = %flight.id(), "Flight times updated");
        Ok(flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryFlightRepository;
    use crate::domain::flight::test_support::flight;
    use crate::domain::flight::FlightType;
    use crate::domain::foundation::Timestamp;

    #[tokio::test]
    async fn actual_departure_is_recorded_and_published() {
        let repo = Arc::new(InMemoryFlightRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = UpdateFlightTimesHandler::new(repo.clone(), bus.clone());
        let record = flight(FlightType::Departure);
        repo.save(&record).await.unwrap();

        let departed = Timestamp::now();
        let updated = handler
            .handle(
                UpdateFlightTimesCommand {
                    flight_id: record.id(),
                    times: FlightTimesUpdate {
                        actual_departure: Some(departed),
                        ..Default::default()
                    },
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(updated.actual_departure(), Some(departed));
        assert!(bus.has_event("flight.updated"));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let repo = Arc::new(InMemoryFlightRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = UpdateFlightTimesHandler::new(repo, bus.clone());

        let err = handler
            .handle(
                UpdateFlightTimesCommand {
                    flight_id: FlightId::new(),
                    times: FlightTimesUpdate::default(),
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FlightError::ValidationFailed { .. }));
        assert_eq!(bus.event_count(), 0);
    }
}
