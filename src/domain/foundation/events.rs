//! Domain events and the envelope the hub routes.
//!
//! Handlers turn a typed event into an [`EventEnvelope`] with
//! `to_envelope()`. The envelope carries the airports whose topics must hear
//! about it; the hub reads nothing else to route.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{AirportCode, DomainError, ErrorCode, Timestamp};

/// Identity and routing data every domain event exposes.
pub trait DomainEvent: Send + Sync {
    /// Dotted type, e.g. `flight.status_changed`.
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> String;

    fn aggregate_type(&self) -> &'static str;

    fn occurred_at(&self) -> Timestamp;

    fn event_id(&self) -> EventId;

    /// Airport topics to notify. Empty routes to the global topic only.
    fn affected_airports(&self) -> Vec<AirportCode> {
        Vec::new()
    }
}

/// `to_envelope()` for every serializable [`DomainEvent`].
pub trait SerializableDomainEvent: DomainEvent + Serialize {
    fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        EventEnvelope::from_event(self)
    }
}

impl<T: DomainEvent + Serialize> SerializableDomainEvent for T {}

/// Implements [`DomainEvent`] from field names.
///
/// The optional `airports` argument names a `&self` method returning the
/// affected airports.
///
/// ```ignore
/// domain_event!(
///     FlightDeleted,
///     event_type = "flight.deleted",
///     aggregate_id = flight_id,
///     aggregate_type = "Flight",
///     occurred_at = deleted_at,
///     event_id = event_id,
///     airports = route_airports
/// );
/// ```
#[macro_export]
macro_rules! domain_event {
    (
        $event_name:ident,
        event_type = $event_type:expr,
        aggregate_id = $agg_id_field:ident,
        aggregate_type = $agg_type:expr,
        occurred_at = $occurred_field:ident,
        event_id = $event_id_field:ident
        $(, airports = $airports_fn:ident)?
    ) => {
        impl $crate::domain::foundation::DomainEvent for $event_name {
            fn event_type(&self) -> &'static str {
                $event_type
            }

            fn aggregate_id(&self) -> String {
                self.$agg_id_field.to_string()
            }

            fn aggregate_type(&self) -> &'static str {
                $agg_type
            }

            fn occurred_at(&self) -> $crate::domain::foundation::Timestamp {
                self.$occurred_field
            }

            fn event_id(&self) -> $crate::domain::foundation::EventId {
                self.$event_id_field.clone()
            }

            $(
                fn affected_airports(&self) -> Vec<$crate::domain::foundation::AirportCode> {
                    self.$airports_fn()
                }
            )?
        }
    };
}

pub use domain_event;

/// Unique id of one event instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request correlation carried alongside the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// A published domain event, as seen by subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub aggregate_type: String,
    pub occurred_at: Timestamp,

    /// Airport topics to notify. Empty means global only.
    #[serde(default)]
    pub airports: Vec<AirportCode>,

    /// The serialized event.
    pub payload: JsonValue,

    #[serde(default)]
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Untyped envelope with no airports, stamped now.
    pub fn new(
        event_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            occurred_at: Timestamp::now(),
            airports: Vec::new(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    pub fn from_event<T>(event: &T) -> Result<Self, DomainError>
    where
        T: DomainEvent + Serialize + ?Sized,
    {
        let payload = serde_json::to_value(event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {}: {}", event.event_type(), e),
            )
        })?;

        Ok(Self {
            event_id: event.event_id(),
            event_type: event.event_type().to_string(),
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_string(),
            occurred_at: event.occurred_at(),
            airports: event.affected_airports(),
            payload,
            metadata: EventMetadata::default(),
        })
    }

    pub fn with_airports(mut self, airports: Vec<AirportCode>) -> Self {
        self.airports = airports;
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(id.into());
        self
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.metadata.correlation_id.as_deref()
    }
}
