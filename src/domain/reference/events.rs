//! Airport and airline reference-data events.
//!
//! The admin collaborator owns reference data; the hub only relays its
//! mutations. Airport events reach that airport's topic and the global one,
//! airline events reach the global topic only.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    AirportCode, DomainEvent, EventId, Timestamp, ValidationError,
};
use crate::domain::realtime::EventKind;

/// What happened to a reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for ReferenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferenceAction::Created => "created",
            ReferenceAction::Updated => "updated",
            ReferenceAction::Deleted => "deleted",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ReferenceAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ReferenceAction::Created),
            "updated" => Ok(ReferenceAction::Updated),
            "deleted" => Ok(ReferenceAction::Deleted),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("unknown action '{}'", other),
            )),
        }
    }
}

/// An airport record was created, updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportChanged {
    pub event_id: EventId,
    pub action: ReferenceAction,
    pub code: AirportCode,
    /// The record as the admin collaborator sent it.
    #[serde(default)]
    pub data: JsonValue,
    pub occurred_at: Timestamp,
}

impl AirportChanged {
    pub fn new(action: ReferenceAction, code: AirportCode, data: JsonValue) -> Self {
        Self {
            event_id: EventId::new(),
            action,
            code,
            data,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self.action {
            ReferenceAction::Created => EventKind::AirportCreated,
            ReferenceAction::Updated => EventKind::AirportUpdated,
            ReferenceAction::Deleted => EventKind::AirportDeleted,
        }
    }
}

impl DomainEvent for AirportChanged {
    fn event_type(&self) -> &'static str {
        self.kind().event_type()
    }

    fn aggregate_id(&self) -> String {
        self.code.to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Airport"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }

    fn affected_airports(&self) -> Vec<AirportCode> {
        vec![self.code.clone()]
    }
}

/// An airline record was created, updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineChanged {
    pub event_id: EventId,
    pub action: ReferenceAction,
    pub code: String,
    #[serde(default)]
    pub data: JsonValue,
    pub occurred_at: Timestamp,
}

impl AirlineChanged {
    pub fn new(action: ReferenceAction, code: impl Into<String>, data: JsonValue) -> Self {
        Self {
            event_id: EventId::new(),
            action,
            code: code.into(),
            data,
            occurred_at: Timestamp::now(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self.action {
            ReferenceAction::Created => EventKind::AirlineCreated,
            ReferenceAction::Updated => EventKind::AirlineUpdated,
            ReferenceAction::Deleted => EventKind::AirlineDeleted,
        }
    }
}

impl DomainEvent for AirlineChanged {
    fn event_type(&self) -> &'static str {
        self.kind().event_type()
    }

    fn aggregate_id(&self) -> String {
        self.code.clone()
    }

    fn aggregate_type(&self) -> &'static str {
        "Airline"
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    fn event_id(&self) -> EventId {
        self.event_id.clone()
    }
}
