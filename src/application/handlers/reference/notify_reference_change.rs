//! NotifyReferenceChangeHandler - relays airport and airline mutations.
//!
//! The admin collaborator owns reference data. It reports each mutation
//! here so connected displays and dashboards can refresh.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{
    AirportCode, CommandMetadata, DomainError, EventEnvelope, SerializableDomainEvent,
};
use crate::domain::reference::{AirlineChanged, AirportChanged, ReferenceAction};
use crate::ports::EventPublisher;

/// A reference-data mutation reported by the admin collaborator.
#[derive(Debug, Clone)]
pub enum NotifyReferenceChangeCommand {
    Airport {
        action: ReferenceAction,
        code: AirportCode,
        data: Value,
    },
    Airline {
        action: ReferenceAction,
        code: String,
        data: Value,
    },
}

pub struct NotifyReferenceChangeHandler {
    event_publisher: Arc<dyn EventPublisher>,
}

impl NotifyReferenceChangeHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self { event_publisher }
    }

    /// Publish the matching event and return its envelope.
    pub async fn handle(
        &self,
        cmd: NotifyReferenceChangeCommand,
        metadata: CommandMetadata,
    ) -> Result<EventEnvelope, DomainError> {
        let envelope = match cmd {
            NotifyReferenceChangeCommand::Airport { action, code, data } => {
                AirportChanged::new(action, code, data).to_envelope()?
            }
            NotifyReferenceChangeCommand::Airline { action, code, data } => {
                if code.trim().is_empty() {
                    return Err(DomainError::validation("code", "Airline code cannot be empty"));
                }
                AirlineChanged::new(action, code.trim().to_ascii_uppercase(), data)
                    .to_envelope()?
            }
        }
        .with_correlation_id(metadata.correlation_id());

        tracing::debug!(
            event_type = %envelope.event_type,
            aggregate_id = %envelope.aggregate_id,
            "Relaying reference change"
        );
        self.event_publisher.publish(envelope.clone()).await?;
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn airport_change_is_scoped_to_that_airport() {
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = NotifyReferenceChangeHandler::new(bus.clone());
        let cdg = AirportCode::new("CDG").unwrap();

        let envelope = handler
            .handle(
                NotifyReferenceChangeCommand::Airport {
                    action: ReferenceAction::Updated,
                    code: cdg.clone(),
                    data: json!({"name": "Paris-CDG"}),
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(envelope.event_type, "airport.updated");
        assert_eq!(envelope.airports, vec![cdg]);
        assert_eq!(bus.event_count(), 1);
    }

    #[tokio::test]
    async fn airline_change_is_global() {
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = NotifyReferenceChangeHandler::new(bus.clone());

        let envelope = handler
            .handle(
                NotifyReferenceChangeCommand::Airline {
                    action: ReferenceAction::Deleted,
                    code: "af".to_string(),
                    data: Value::Null,
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap();

        assert_eq!(envelope.event_type, "airline.deleted");
        assert_eq!(envelope.aggregate_id, "AF");
        assert!(envelope.airports.is_empty());
    }

    #[tokio::test]
    async fn blank_airline_code_is_rejected() {
        let bus = Arc::new(InMemoryEventBus::recording());
        let handler = NotifyReferenceChangeHandler::new(bus.clone());

        let err = handler
            .handle(
                NotifyReferenceChangeCommand::Airline {
                    action: ReferenceAction::Created,
                    code: "  ".to_string(),
                    data: Value::Null,
                },
                CommandMetadata::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(bus.event_count(), 0);
    }
}
