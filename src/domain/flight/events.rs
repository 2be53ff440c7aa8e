//! Flight domain events.
//!
//! Events published when a flight record changes:
//! - `FlightCreated` - record registered
//! - `FlightUpdated` - estimated/actual times changed
//! - `FlightStatusChanged` - status moved, carries old and new status
//! - `FlightDeleted` - record removed
//!
//! Every flight event is routed to both the origin and destination airport
//! topics and, under its `:global` name, to the global topic. Payloads are
//! forwarded to displays verbatim, hence the camelCase field names.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, AirportCode, EventId, FlightId, Timestamp};

use super::aggregate::route_airports;
use super::{Flight, FlightStatus, FlightType};

// ════════════════════════════════════════════════════════════════════════════
// FlightCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a flight record is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCreated {
    pub event_id: EventId,
    pub flight_id: FlightId,
    pub flight: Flight,
    pub created_at: Timestamp,
}

impl FlightCreated {
    pub fn new(flight: &Flight) -> Self {
        Self {
            event_id: EventId::new(),
            flight_id: flight.id(),
            flight: flight.clone(),
            created_at: Timestamp::now(),
        }
    }

    fn route_airports(&self) -> Vec<AirportCode> {
        self.flight.route_airports()
    }
}

domain_event!(
    FlightCreated,
    event_type = "flight.created",
    aggregate_id = flight_id,
    aggregate_type = "Flight",
    occurred_at = created_at,
    event_id = event_id,
    airports = route_airports
);

// ════════════════════════════════════════════════════════════════════════════
// FlightUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a record's estimated or actual times change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdated {
    pub event_id: EventId,
    pub flight_id: FlightId,
    pub flight: Flight,
    pub updated_at: Timestamp,
}

impl FlightUpdated {
    pub fn new(flight: &Flight) -> Self {
        Self {
            event_id: EventId::new(),
            flight_id: flight.id(),
            flight: flight.clone(),
            updated_at: flight.updated_at(),
        }
    }

    fn route_airports(&self) -> Vec<AirportCode> {
        self.flight.route_airports()
    }
}

domain_event!(
    FlightUpdated,
    event_type = "flight.updated",
    aggregate_id = flight_id,
    aggregate_type = "Flight",
    occurred_at = updated_at,
    event_id = event_id,
    airports = route_airports
);

// ════════════════════════════════════════════════════════════════════════════
// FlightStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published for each record whose status changed.
///
/// A transition on one side of a linked pair produces one of these for the
/// requested record and one for its counterpart, each with its own old status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatusChanged {
    pub event_id: EventId,
    pub flight_id: FlightId,
    pub flight_number: String,
    pub flight_type: FlightType,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub old_status: FlightStatus,
    pub new_status: FlightStatus,
    #[serde(default)]
    pub linked_flight_id: Option<FlightId>,
    pub changed_at: Timestamp,
}

impl FlightStatusChanged {
    fn route_airports(&self) -> Vec<AirportCode> {
        route_airports(&self.origin, &self.destination)
    }
}

domain_event!(
    FlightStatusChanged,
    event_type = "flight.status_changed",
    aggregate_id = flight_id,
    aggregate_type = "Flight",
    occurred_at = changed_at,
    event_id = event_id,
    airports = route_airports
);

// ════════════════════════════════════════════════════════════════════════════
// FlightDeleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a flight record is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDeleted {
    pub event_id: EventId,
    pub flight_id: FlightId,
    pub flight_number: String,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub deleted_at: Timestamp,
}

impl FlightDeleted {
    pub fn new(flight: &Flight) -> Self {
        Self {
            event_id: EventId::new(),
            flight_id: flight.id(),
            flight_number: flight.flight_number().to_string(),
            origin: flight.origin().clone(),
            destination: flight.destination().clone(),
            deleted_at: Timestamp::now(),
        }
    }

    fn route_airports(&self) -> Vec<AirportCode> {
        route_airports(&self.origin, &self.destination)
    }
}

domain_event!(
    FlightDeleted,
    event_type = "flight.deleted",
    aggregate_id = flight_id,
    aggregate_type = "Flight",
    occurred_at = deleted_at,
    event_id = event_id,
    airports = route_airports
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flight::aggregate::test_support::{code, flight};
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};
    use crate::domain::realtime::EventKind;

    #[test]
    fn event_types_match_event_kinds() {
        let departure = flight(FlightType::Departure);
        let mut changed = departure.clone();
        let status = changed.request_transition(FlightStatus::OnTime).unwrap();
        let updated = changed.update_times(Default::default());

        assert_eq!(
            FlightCreated::new(&departure).event_type(),
            EventKind::FlightCreated.event_type()
        );
        assert_eq!(updated.event_type(), EventKind::FlightUpdated.event_type());
        assert_eq!(status.event_type(), EventKind::FlightStatusChanged.event_type());
        assert_eq!(
            FlightDeleted::new(&departure).event_type(),
            EventKind::FlightDeleted.event_type()
        );
    }

    #[test]
    fn status_changed_envelope_targets_origin_and_destination() {
        let mut departure = flight(FlightType::Departure);
        let event = departure.request_transition(FlightStatus::Delayed).unwrap();
        let envelope = event.to_envelope().unwrap();

        assert_eq!(envelope.airports, vec![code("CDG"), code("JFK")]);
        assert_eq!(envelope.aggregate_type, "Flight");
        assert_eq!(envelope.payload["oldStatus"], "scheduled");
        assert_eq!(envelope.payload["newStatus"], "delayed");
    }

    #[test]
    fn deleted_payload_identifies_the_flight() {
        let departure = flight(FlightType::Departure);
        let envelope = FlightDeleted::new(&departure).to_envelope().unwrap();

        assert_eq!(envelope.aggregate_id, departure.id().to_string());
        assert_eq!(envelope.payload["flightNumber"], "AF1234");
    }
}
