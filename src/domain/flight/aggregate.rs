//! Flight aggregate entity.
//!
//! A physical leg is recorded twice: a departure record at the origin airport
//! and an arrival record at the destination airport. The two records point at
//! each other through `linked_flight_id` and keep their statuses in agreement.
//!
//! # Ownership
//!
//! Status is owned by the state machine in [`super::FlightStatus`] and only
//! changes through [`Flight::request_transition`] or, for the counterpart of a
//! linked pair, [`Flight::mirror_status`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    AirportCode, EventId, FlightId, StateMachine, Timestamp, ValidationError,
};

use super::{FlightError, FlightStatus, FlightStatusChanged, FlightUpdated};

/// Which side of a leg a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightType {
    Departure,
    Arrival,
}

impl FlightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightType::Departure => "departure",
            FlightType::Arrival => "arrival",
        }
    }

    /// The other side of the leg.
    pub fn counterpart(&self) -> Self {
        match self {
            FlightType::Departure => FlightType::Arrival,
            FlightType::Arrival => FlightType::Departure,
        }
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlightType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "departure" | "departures" => Ok(FlightType::Departure),
            "arrival" | "arrivals" => Ok(FlightType::Arrival),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("'{}' is neither departure nor arrival", other),
            )),
        }
    }
}

/// Data needed to register a flight record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub flight_type: FlightType,
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub scheduled_departure: Timestamp,
    pub scheduled_arrival: Timestamp,
    #[serde(default)]
    pub linked_flight_id: Option<FlightId>,
}

/// Estimated/actual time changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightTimesUpdate {
    #[serde(default)]
    pub estimated_departure: Option<Timestamp>,
    #[serde(default)]
    pub estimated_arrival: Option<Timestamp>,
    #[serde(default)]
    pub actual_departure: Option<Timestamp>,
    #[serde(default)]
    pub actual_arrival: Option<Timestamp>,
}

impl FlightTimesUpdate {
    pub fn is_empty(&self) -> bool {
        self.estimated_departure.is_none()
            && self.estimated_arrival.is_none()
            && self.actual_departure.is_none()
            && self.actual_arrival.is_none()
    }
}

/// Flight record aggregate.
///
/// # Invariants
///
/// - `flight_number` is non-empty
/// - `status` only moves along the transition table, except when mirroring a
///   linked counterpart
/// - `linked_flight_id` never points at the record itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    id: FlightId,
    flight_number: String,
    flight_type: FlightType,
    origin: AirportCode,
    destination: AirportCode,
    scheduled_departure: Timestamp,
    scheduled_arrival: Timestamp,
    #[serde(default)]
    estimated_departure: Option<Timestamp>,
    #[serde(default)]
    estimated_arrival: Option<Timestamp>,
    #[serde(default)]
    actual_departure: Option<Timestamp>,
    #[serde(default)]
    actual_arrival: Option<Timestamp>,
    #[serde(default)]
    status: FlightStatus,
    #[serde(default)]
    linked_flight_id: Option<FlightId>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Flight {
    /// Create a new scheduled flight record.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the flight number is blank
    pub fn new(id: FlightId, data: NewFlight) -> Result<Self, FlightError> {
        let flight_number = data.flight_number.trim().to_ascii_uppercase();
        if flight_number.is_empty() {
            return Err(FlightError::validation(
                "flight_number",
                "Flight number cannot be empty",
            ));
        }
        if data.linked_flight_id == Some(id) {
            return Err(FlightError::validation(
                "linked_flight_id",
                "A flight cannot be linked to itself",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            flight_number,
            flight_type: data.flight_type,
            origin: data.origin,
            destination: data.destination,
            scheduled_departure: data.scheduled_departure,
            scheduled_arrival: data.scheduled_arrival,
            estimated_departure: None,
            estimated_arrival: None,
            actual_departure: None,
            actual_arrival: None,
            status: FlightStatus::Scheduled,
            linked_flight_id: data.linked_flight_id,
            created_at: now,
            updated_at: now,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> FlightId {
        self.id
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn flight_type(&self) -> FlightType {
        self.flight_type
    }

    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    pub fn scheduled_departure(&self) -> Timestamp {
        self.scheduled_departure
    }

    pub fn scheduled_arrival(&self) -> Timestamp {
        self.scheduled_arrival
    }

    pub fn estimated_departure(&self) -> Option<Timestamp> {
        self.estimated_departure
    }

    pub fn estimated_arrival(&self) -> Option<Timestamp> {
        self.estimated_arrival
    }

    pub fn actual_departure(&self) -> Option<Timestamp> {
        self.actual_departure
    }

    pub fn actual_arrival(&self) -> Option<Timestamp> {
        self.actual_arrival
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn linked_flight_id(&self) -> Option<FlightId> {
        self.linked_flight_id
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The airport whose board shows this record: origin for a departure,
    /// destination for an arrival.
    pub fn board_airport(&self) -> &AirportCode {
        match self.flight_type {
            FlightType::Departure => &self.origin,
            FlightType::Arrival => &self.destination,
        }
    }

    /// Scheduled time on this record's side of the leg.
    pub fn scheduled_time(&self) -> Timestamp {
        match self.flight_type {
            FlightType::Departure => self.scheduled_departure,
            FlightType::Arrival => self.scheduled_arrival,
        }
    }

    /// Actual time on this record's side of the leg, once known.
    pub fn actual_time(&self) -> Option<Timestamp> {
        match self.flight_type {
            FlightType::Departure => self.actual_departure,
            FlightType::Arrival => self.actual_arrival,
        }
    }

    /// Origin and destination topics, deduplicated.
    pub fn route_airports(&self) -> Vec<AirportCode> {
        route_airports(&self.origin, &self.destination)
    }

    /// True if this record appears on the given airport's board for the given type.
    pub fn is_listed_at(&self, airport: &AirportCode, flight_type: Option<FlightType>) -> bool {
        self.board_airport() == airport && flight_type.map_or(true, |t| t == self.flight_type)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Link this record to its counterpart on the other side of the leg.
    pub fn link_to(&mut self, counterpart: FlightId) -> Result<(), FlightError> {
        if counterpart == self.id {
            return Err(FlightError::validation(
                "linked_flight_id",
                "A flight cannot be linked to itself",
            ));
        }
        self.linked_flight_id = Some(counterpart);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Request a status change along the transition table.
    ///
    /// # Errors
    ///
    /// - `SameState` if `new_status` is the current status
    /// - `InvalidTransition` if the edge is not in the table
    ///
    /// On error the record is left untouched.
    pub fn request_transition(
        &mut self,
        new_status: FlightStatus,
    ) -> Result<FlightStatusChanged, FlightError> {
        let next = self.status.transition_to(new_status)?;
        Ok(self.commit_status(next))
    }

    /// Bring a linked counterpart's status in line with its partner.
    ///
    /// Returns `None` when the record already agrees.
    pub fn mirror_status(&mut self, new_status: FlightStatus) -> Option<FlightStatusChanged> {
        if self.status == new_status {
            return None;
        }
        Some(self.commit_status(new_status))
    }

    /// Apply estimated/actual time changes.
    pub fn update_times(&mut self, update: FlightTimesUpdate) -> FlightUpdated {
        if let Some(t) = update.estimated_departure {
            self.estimated_departure = Some(t);
        }
        if let Some(t) = update.estimated_arrival {
            self.estimated_arrival = Some(t);
        }
        if let Some(t) = update.actual_departure {
            self.actual_departure = Some(t);
        }
        if let Some(t) = update.actual_arrival {
            self.actual_arrival = Some(t);
        }
        self.updated_at = Timestamp::now();

        FlightUpdated {
            event_id: EventId::new(),
            flight_id: self.id,
            flight: self.clone(),
            updated_at: self.updated_at,
        }
    }

    fn commit_status(&mut self, new_status: FlightStatus) -> FlightStatusChanged {
        let old_status = std::mem::replace(&mut self.status, new_status);
        self.updated_at = Timestamp::now();

        FlightStatusChanged {
            event_id: EventId::new(),
            flight_id: self.id,
            flight_number: self.flight_number.clone(),
            flight_type: self.flight_type,
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            old_status,
            new_status,
            linked_flight_id: self.linked_flight_id,
            changed_at: self.updated_at,
        }
    }
}

pub(crate) fn route_airports(origin: &AirportCode, destination: &AirportCode) -> Vec<AirportCode> {
    if origin == destination {
        vec![origin.clone()]
    } else {
        vec![origin.clone(), destination.clone()]
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn code(s: &str) -> AirportCode {
        AirportCode::new(s).unwrap()
    }

    pub fn new_flight(flight_type: FlightType) -> NewFlight {
        let departure = Timestamp::now().plus_minutes(60);
        NewFlight {
            flight_number: "AF1234".to_string(),
            flight_type,
            origin: code("CDG"),
            destination: code("JFK"),
            scheduled_departure: departure,
            scheduled_arrival: departure.plus_minutes(480),
            linked_flight_id: None,
        }
    }

    pub fn flight(flight_type: FlightType) -> Flight {
        Flight::new(FlightId::new(), new_flight(flight_type)).unwrap()
    }

    pub fn flight_with_status(status: FlightStatus) -> Flight {
        let mut flight = flight(FlightType::Departure);
        flight.status = status;
        flight
    }
}
