//! DeleteFlightHandler - removes a flight record.

use std::sync::Arc;

use crate::domain::flight::{FlightDeleted, FlightError};
use crate::domain::foundation::{CommandMetadata, FlightId, SerializableDomainEvent};
use crate::ports::{EventPublisher, FlightRepository};

#[derive(Debug, Clone)]
pub struct DeleteFlightCommand {
    pub flight_id: FlightId,
}

pub struct DeleteFlightHandler {
    repository: Arc<dyn FlightRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteFlightHandler {
    pub fn new(
        repository: Arc<dyn FlightRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    /// Delete the record. The counterpart of a linked pair is kept; its link
    /// dangles and later transitions skip the mirror.
    pub async fn handle(
        &self,
        cmd: DeleteFlightCommand,
        metadata: CommandMetadata,
    ) -> Result<FlightDeleted, FlightError> {
        let flight = self
            .repository
            .find_by_id(&cmd.flight_id)
            .await?
            .ok_or_else(|| FlightError::not_found(cmd.flight_id))?;

        self.repository.delete(&cmd.flight_id).await?;

        let event = FlightDeleted::new(&flight);
        let envelope = event
            .to_envelope()?
            .with_correlation_id(metadata.correlation_id());
        self.event_publisher.publish(envelope).await?;

        tracing::info!(
            flight_id = %flight.id(),
            flight_number = %flight.flight_number(),
            "Flight deleted"
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryFlightRepository;
    use crate::domain::flight::test_support::flight;
    use crate::domain::flight::FlightType;

    #[tokio::test]
    async fn delete_removes_and_publishes() {
        let repo = Arc::new(InMemoryFlightRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = DeleteFlightHandler::new(repo.clone(), bus.clone());
        let record = flight(FlightType::Arrival);
        repo.save(&record).await.unwrap();

        let event = handler
            .handle(
                DeleteFlightCommand {
                    flight_id: record.id(),
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(event.flight_id, record.id());
        assert_eq!(repo.count().await, 0);
        assert!(bus.has_event("flight.deleted"));
    }

    #[tokio::test]
    async fn deleting_unknown_flight_is_not_found() {
        let repo = Arc::new(InMemoryFlightRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = DeleteFlightHandler::new(repo, bus);
        let id = FlightId::new();

        let err = handler
            .handle(DeleteFlightCommand { flight_id: id }, CommandMetadata::new())
            .await
            .unwrap_err();
        assert_eq!(err, FlightError::NotFound(id));
    }
}
