//! ChangeFlightStatusHandler - authoritative status transition.
//!
//! The requesting side may pre-check the table for quick feedback; this
//! handler re-validates against the stored record before anything is
//! committed or published. Writes are conditional on the status that was
//! validated, so two racing requests cannot both commit from one state.

use std::sync::Arc;

use crate::domain::flight::{Flight, FlightError, FlightStatus, FlightStatusChanged};
use crate::domain::foundation::{CommandMetadata, FlightId, SerializableDomainEvent};
use crate::ports::{EventPublisher, FlightRepository};

/// Reload-and-revalidate rounds before giving up with `Conflict`.
const MAX_ATTEMPTS: u32 = 3;

/// Command to move a flight to a new status.
#[derive(Debug, Clone)]
pub struct ChangeFlightStatusCommand {
    pub flight_id: FlightId,
    pub new_status: FlightStatus,
}

/// Result of a committed transition.
#[derive(Debug, Clone)]
pub struct ChangeFlightStatusResult {
    pub flight: Flight,
    /// The linked counterpart after mirroring, if it exists.
    pub counterpart: Option<Flight>,
    /// One event for the flight, plus one for the counterpart when it moved.
    pub events: Vec<FlightStatusChanged>,
}

/// Handler for flight status transitions.
pub struct ChangeFlightStatusHandler {
    repository: Arc<dyn FlightRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChangeFlightStatusHandler {
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
        cmd: ChangeFlightStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangeFlightStatusResult, FlightError> {
        // 1. Validate against the stored record and commit
        let (flight, changed) = self.commit(cmd.flight_id, cmd.new_status).await?;
        let mut events = vec![changed];

        // 2. Mirror onto the linked counterpart
        let counterpart = match flight.linked_flight_id() {
            Some(linked_id) => self.mirror(flight.id(), linked_id, cmd.new_status).await?,
            None => None,
        };
        let counterpart = counterpart.map(|(other, mirrored)| {
            events.extend(mirrored);
            other
        });

        // 3. Publish
        let envelopes = events
            .iter()
            .map(|event| {
                event
                    .to_envelope()
                    .map(|e| e.with_correlation_id(metadata.correlation_id()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.event_publisher.publish_all(envelopes).await?;

        tracing::info!(
            flight_id = %flight.id(),
            flight_number = %flight.flight_number(),
            old_status = %events[0].old_status,
            new_status = %cmd.new_status,
            mirrored = events.len() > 1,
            "Flight status changed"
        );

        Ok(ChangeFlightStatusResult {
            flight,
            counterpart,
            events,
        })
    }

    async fn commit(
        &self,
        id: FlightId,
        new_status: FlightStatus,
    ) -> Result<(Flight, FlightStatusChanged), FlightError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut flight = self
                .repository
                .find_by_id(&id)
                .await?
                .ok_or_else(|| FlightError::not_found(id))?;
            let expected = flight.status();
            let changed = flight.request_transition(new_status)?;

            if self.repository.save_if_status(&flight, expected).await? {
                return Ok((flight, changed));
            }
            tracing::debug!(flight_id = %id, attempt, "Flight status moved underneath, retrying");
        }
        Err(FlightError::Conflict(id))
    }

    /// Returns `None` when the counterpart record is missing.
    async fn mirror(
        &self,
        flight_id: FlightId,
        linked_id: FlightId,
        new_status: FlightStatus,
    ) -> Result<Option<(Flight, Option<FlightStatusChanged>)>, FlightError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let Some(mut other) = self.repository.find_by_id(&linked_id).await? else {
                tracing::warn!(
                    flight_id = %flight_id,
                    linked_flight_id = %linked_id,
                    "Linked flight not found, status not mirrored"
                );
                return Ok(None);
            };
            let expected = other.status();
            let Some(mirrored) = other.mirror_status(new_status) else {
                return Ok(Some((other, None)));
            };

            if self.repository.save_if_status(&other, expected).await? {
                return Ok(Some((other, Some(mirrored))));
            }
            tracing::debug!(flight_id = %linked_id, attempt, "Linked flight moved underneath, retrying");
        }
        Err(FlightError::Conflict(linked_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryFlightRepository;
    use crate::domain::flight::test_support::new_flight;
    use crate::domain::flight::FlightType;
    use crate::domain::foundation::{AirportCode, DomainError};
    use async_trait::async_trait;

    /// Yields after every read so concurrent handlers interleave between
    /// load and save.
    struct InterleavingRepository {
        inner: InMemoryFlightRepository,
        refuse_writes: bool,
    }

    #[async_trait]
    impl FlightRepository for InterleavingRepository {
        async fn save(&self, flight: &Flight) -> Result<(), DomainError> {
            self.inner.save(flight).await
        }

        async fn save_if_status(
            &self,
            flight: &Flight,
            expected: FlightStatus,
        ) -> Result<bool, DomainError> {
            if self.refuse_writes {
                return Ok(false);
            }
            self.inner.save_if_status(flight, expected).await
        }

        async fn find_by_id(&self, id: &FlightId) -> Result<Option<Flight>, DomainError> {
            let found = self.inner.find_by_id(id).await;
            tokio::task::yield_now().await;
            found
        }

        async fn find_by_airport(
            &self,
            airport: &AirportCode,
            flight_type: Option<FlightType>,
        ) -> Result<Vec<Flight>, DomainError> {
            self.inner.find_by_airport(airport, flight_type).await
        }

        async fn delete(&self, id: &FlightId) -> Result<(), DomainError> {
            self.inner.delete(id).await
        }
    }

    async fn boarding_flight(repo: &InMemoryFlightRepository) -> Flight {
        let mut flight = Flight::new(FlightId::new(), new_flight(FlightType::Departure)).unwrap();
        flight.request_transition(FlightStatus::OnTime).unwrap();
        flight.request_transition(FlightStatus::Boarding).unwrap();
        repo.save(&flight).await.unwrap();
        flight
    }

    struct Fixture {
        repo: Arc<InMemoryFlightRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: ChangeFlightStatusHandler,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryFlightRepository::new());
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = ChangeFlightStatusHandler::new(repo.clone(), bus.clone());
        Fixture { repo, bus, handler }
    }

    async fn linked_pair(repo: &InMemoryFlightRepository) -> (Flight, Flight) {
        let departure_id = FlightId::new();
        let arrival_id = FlightId::new();

        let mut dep = new_flight(FlightType::Departure);
        dep.linked_flight_id = Some(arrival_id);
        let mut arr = new_flight(FlightType::Arrival);
        arr.linked_flight_id = Some(departure_id);

        let dep = Flight::new(departure_id, dep).unwrap();
        let arr = Flight::new(arrival_id, arr).unwrap();
        repo.save(&dep).await.unwrap();
        repo.save(&arr).await.unwrap();
        (dep, arr)
    }

    fn cmd(flight_id: FlightId, new_status: FlightStatus) -> ChangeFlightStatusCommand {
        ChangeFlightStatusCommand {
            flight_id,
            new_status,
        }
    }

    #[tokio::test]
    async fn valid_transition_is_persisted_and_published() {
        let f = fixture();
        let flight = Flight::new(FlightId::new(), new_flight(FlightType::Departure)).unwrap();
        f.repo.save(&flight).await.unwrap();

        let result = f
            .handler
            .handle(cmd(flight.id(), FlightStatus::Delayed), CommandMetadata::new())
            .await
            .unwrap();

        assert_eq!(result.flight.status(), FlightStatus::Delayed);
        assert_eq!(result.events.len(), 1);
        let stored = f.repo.find_by_id(&flight.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), FlightStatus::Delayed);
        assert_eq!(f.bus.events_of_type("flight.status_changed").len(), 1);
    }

    #[tokio::test]
    async fn same_state_is_rejected_without_publishing() {
        let f = fixture();
        let flight = Flight::new(FlightId::new(), new_flight(FlightType::Departure)).unwrap();
        f.repo.save(&flight).await.unwrap();

        let err = f
            .handler
            .handle(cmd(flight.id(), FlightStatus::Scheduled), CommandMetadata::new())
            .await
            .unwrap_err();

        assert_eq!(err, FlightError::SameState(FlightStatus::Scheduled));
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn invalid_transition_leaves_record_untouched() {
        let f = fixture();
        let flight = Flight::new(FlightId::new(), new_flight(FlightType::Departure)).unwrap();
        f.repo.save(&flight).await.unwrap();

        let err = f
            .handler
            .handle(cmd(flight.id(), FlightStatus::Landed), CommandMetadata::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FlightError::InvalidTransition { .. }));
        let stored = f.repo.find_by_id(&flight.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), FlightStatus::Scheduled);
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn unknown_flight_is_not_found() {
        let f = fixture();
        let id = FlightId::new();
        let err = f
            .handler
            .handle(cmd(id, FlightStatus::OnTime), CommandMetadata::new())
            .await
            .unwrap_err();
        assert_eq!(err, FlightError::NotFound(id));
    }

    #[tokio::test]
    async fn linked_pair_both_receive_status_changed() {
        let f = fixture();
        let (dep, arr) = linked_pair(&f.repo).await;

        let result = f
            .handler
            .handle(
                cmd(dep.id(), FlightStatus::OnTime),
                CommandMetadata::new().with_correlation_id("req-1"),
            )
            .await
            .unwrap();

        assert_eq!(result.events.len(), 2);
        assert_eq!(result.counterpart.unwrap().status(), FlightStatus::OnTime);

        let published = f.bus.events_of_type("flight.status_changed");
        let ids: Vec<_> = published.iter().map(|e| e.aggregate_id.clone()).collect();
        assert_eq!(ids, vec![dep.id().to_string(), arr.id().to_string()]);
        assert!(published
            .iter()
            .all(|e| e.metadata.correlation_id.as_deref() == Some("req-1")));
    }

    #[tokio::test]
    async fn change_from_arrival_side_reaches_departure() {
        let f = fixture();
        let (dep, arr) = linked_pair(&f.repo).await;

        f.handler
            .handle(cmd(arr.id(), FlightStatus::Delayed), CommandMetadata::new())
            .await
            .unwrap();

        let stored = f.repo.find_by_id(&dep.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), FlightStatus::Delayed);
        assert_eq!(f.bus.events_for_aggregate(&dep.id().to_string()).len(), 1);
    }

    #[tokio::test]
    async fn missing_counterpart_does_not_block_transition() {
        let f = fixture();
        let mut data = new_flight(FlightType::Departure);
        data.linked_flight_id = Some(FlightId::new());
        let flight = Flight::new(FlightId::new(), data).unwrap();
        f.repo.save(&flight).await.unwrap();

        let result = f
            .handler
            .handle(cmd(flight.id(), FlightStatus::Cancelled), CommandMetadata::new())
            .await
            .unwrap();

        assert!(result.counterpart.is_none());
        assert_eq!(result.events.len(), 1);
    }

    #[tokio::test]
    async fn racing_transitions_commit_only_one() {
        let inner = InMemoryFlightRepository::new();
        let flight = boarding_flight(&inner).await;
        let repo = Arc::new(InterleavingRepository {
            inner: inner.clone(),
            refuse_writes: false,
        });
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = ChangeFlightStatusHandler::new(repo, bus.clone());

        let (departed, delayed) = tokio::join!(
            handler.handle(cmd(flight.id(), FlightStatus::Departed), CommandMetadata::new()),
            handler.handle(cmd(flight.id(), FlightStatus::Delayed), CommandMetadata::new()),
        );

        let winner = match (&departed, &delayed) {
            (Ok(won), Err(lost)) | (Err(lost), Ok(won)) => {
                assert!(matches!(lost, FlightError::InvalidTransition { .. }));
                won.flight.status()
            }
            other => panic!("expected exactly one commit, got {:?}", other),
        };
        let stored = inner.find_by_id(&flight.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), winner);
        assert_eq!(bus.events_of_type("flight.status_changed").len(), 1);
    }

    #[tokio::test]
    async fn persistent_contention_reports_conflict() {
        let inner = InMemoryFlightRepository::new();
        let flight = boarding_flight(&inner).await;
        let repo = Arc::new(InterleavingRepository {
            inner: inner.clone(),
            refuse_writes: true,
        });
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = ChangeFlightStatusHandler::new(repo, bus.clone());

        let err = handler
            .handle(cmd(flight.id(), FlightStatus::Departed), CommandMetadata::new())
            .await
            .unwrap_err();

        assert_eq!(err, FlightError::Conflict(flight.id()));
        assert_eq!(bus.event_count(), 0);
        let stored = inner.find_by_id(&flight.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), FlightStatus::Boarding);
    }
}
