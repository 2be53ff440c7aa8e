//! RegisterFlightHandler - creates a flight record, optionally linked.

use std::sync::Arc;

use crate::domain::flight::{Flight, FlightCreated, FlightError, FlightUpdated, NewFlight};
use crate::domain::foundation::{CommandMetadata, FlightId, SerializableDomainEvent};
use crate::ports::{EventPublisher, FlightRepository};

/// Command to register a flight record.
#[derive(Debug, Clone)]
pub struct RegisterFlightCommand {
    pub flight: NewFlight,
}

#[derive(Debug, Clone)]
pub struct RegisterFlightResult {
    pub flight: Flight,
    /// Counterpart that now links back to the new record.
    pub counterpart: Option<Flight>,
}

/// Handler for registering flights.
pub struct RegisterFlightHandler {
    repository: Arc<dyn FlightRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RegisterFlightHandler {
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
        cmd: RegisterFlightCommand,
        metadata: CommandMetadata,
    ) -> Result<RegisterFlightResult, FlightError> {
        let mut flight = Flight::new(FlightId::new(), cmd.flight)?;

        // A linked record must be the other side of the same leg.
        let counterpart = match flight.linked_flight_id() {
            Some(linked_id) => {
                let mut other = self
                    .repository
                    .find_by_id(&linked_id)
                    .await?
                    .ok_or_else(|| FlightError::not_found(linked_id))?;
                if other.flight_type() != flight.flight_type().counterpart() {
                    return Err(FlightError::validation(
                        "linked_flight_id",
                        format!(
                            "A {} can only be linked to a {}",
                            flight.flight_type(),
                            flight.flight_type().counterpart()
                        ),
                    ));
                }
                other.link_to(flight.id())?;
                // The new record joins the pair in the pair's current status.
                flight.mirror_status(other.status());
                Some(other)
            }
            None => None,
        };

        self.repository.save(&flight).await?;
        let mut envelopes = vec![FlightCreated::new(&flight)
            .to_envelope()?
            .with_correlation_id(metadata.correlation_id())];

        if let Some(other) = &counterpart {
            self.repository.save(other).await?;
            envelopes.push(
                FlightUpdated::new(other)
                    .to_envelope()?
                    .with_correlation_id(metadata.correlation_id()),
            );
        }

        self.event_publisher.publish_all(envelopes).await?;

        tracing::info!(
            flight_id = %flight.id(),
            flight_number = %flight.flight_number(),
            flight_type = %flight.flight_type(),
            linked = counterpart.is_some(),
            "Flight registered"
        );

        Ok(RegisterFlightResult {
            flight,
            counterpart,
        })
    }
}
