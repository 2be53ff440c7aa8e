//! Domain event kinds and their names on the wire.
//!
//! Internally events are typed `aggregate.action` (`flight.status_changed`);
//! on the channel they travel as `aggregate:action` (`flight:statusChanged`).
//! Flight events additionally have a `:global` counterpart so cross-airport
//! dashboards can subscribe independently of airport displays.

use std::fmt;
use std::str::FromStr;

/// Tagged union of every domain mutation the hub fans out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FlightCreated,
    FlightUpdated,
    FlightStatusChanged,
    FlightDeleted,
    AirportCreated,
    AirportUpdated,
    AirportDeleted,
    AirlineCreated,
    AirlineUpdated,
    AirlineDeleted,
    AdvertisementCreated,
    AdvertisementUpdated,
    AdvertisementDeleted,
}

/// The family an event kind belongs to; drives fanout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFamily {
    Flight,
    Airport,
    Airline,
    Advertisement,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::FlightCreated,
        EventKind::FlightUpdated,
        EventKind::FlightStatusChanged,
        EventKind::FlightDeleted,
        EventKind::AirportCreated,
        EventKind::AirportUpdated,
        EventKind::AirportDeleted,
        EventKind::AirlineCreated,
        EventKind::AirlineUpdated,
        EventKind::AirlineDeleted,
        EventKind::AdvertisementCreated,
        EventKind::AdvertisementUpdated,
        EventKind::AdvertisementDeleted,
    ];

    /// Internal event type used on the event bus.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::FlightCreated => "flight.created",
            EventKind::FlightUpdated => "flight.updated",
            EventKind::FlightStatusChanged => "flight.status_changed",
            EventKind::FlightDeleted => "flight.deleted",
            EventKind::AirportCreated => "airport.created",
            EventKind::AirportUpdated => "airport.updated",
            EventKind::AirportDeleted => "airport.deleted",
            EventKind::AirlineCreated => "airline.created",
            EventKind::AirlineUpdated => "airline.updated",
            EventKind::AirlineDeleted => "airline.deleted",
            EventKind::AdvertisementCreated => "advertisement.created",
            EventKind::AdvertisementUpdated => "advertisement.updated",
            EventKind::AdvertisementDeleted => "advertisement.deleted",
        }
    }

    /// Name of the scoped event sent to airport topics.
    pub fn channel_name(&self) -> &'static str {
        match self {
            EventKind::FlightCreated => "flight:created",
            EventKind::FlightUpdated => "flight:updated",
            EventKind::FlightStatusChanged => "flight:statusChanged",
            EventKind::FlightDeleted => "flight:deleted",
            EventKind::AirportCreated => "airport:created",
            EventKind::AirportUpdated => "airport:updated",
            EventKind::AirportDeleted => "airport:deleted",
            EventKind::AirlineCreated => "airline:created",
            EventKind::AirlineUpdated => "airline:updated",
            EventKind::AirlineDeleted => "airline:deleted",
            EventKind::AdvertisementCreated => "advertisement:created",
            EventKind::AdvertisementUpdated => "advertisement:updated",
            EventKind::AdvertisementDeleted => "advertisement:deleted",
        }
    }

    /// Name used on the global topic.
    ///
    /// Flight events get a distinct `:global` name; reference data and
    /// advertisement events keep their scoped name.
    pub fn global_channel_name(&self) -> &'static str {
        match self {
            EventKind::FlightCreated => "flight:created:global",
            EventKind::FlightUpdated => "flight:updated:global",
            EventKind::FlightStatusChanged => "flight:statusChanged:global",
            EventKind::FlightDeleted => "flight:deleted:global",
            other => other.channel_name(),
        }
    }

    pub fn family(&self) -> EventFamily {
        match self {
            EventKind::FlightCreated
            | EventKind::FlightUpdated
            | EventKind::FlightStatusChanged
            | EventKind::FlightDeleted => EventFamily::Flight,
            EventKind::AirportCreated | EventKind::AirportUpdated | EventKind::AirportDeleted => {
                EventFamily::Airport
            }
            EventKind::AirlineCreated | EventKind::AirlineUpdated | EventKind::AirlineDeleted => {
                EventFamily::Airline
            }
            EventKind::AdvertisementCreated
            | EventKind::AdvertisementUpdated
            | EventKind::AdvertisementDeleted => EventFamily::Advertisement,
        }
    }

    /// Every internal event type, for bus subscriptions.
    pub fn all_event_types() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.event_type()).collect()
    }

    /// Scoped channel names of every advertisement event.
    pub fn advertisement_channel_names() -> [&'static str; 3] {
        [
            EventKind::AdvertisementCreated.channel_name(),
            EventKind::AdvertisementUpdated.channel_name(),
            EventKind::AdvertisementDeleted.channel_name(),
        ]
    }

    /// Scoped channel names of every flight event.
    pub fn flight_channel_names() -> [&'static str; 4] {
        [
            EventKind::FlightCreated.channel_name(),
            EventKind::FlightUpdated.channel_name(),
            EventKind::FlightStatusChanged.channel_name(),
            EventKind::FlightDeleted.channel_name(),
        ]
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event_type())
    }
}

/// Unknown internal event type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type '{0}'")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.event_type() == s || k.channel_name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}
