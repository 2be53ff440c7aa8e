//! FlightStatus enum and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a flight record.
///
/// `Arrived` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    OnTime,
    Delayed,
    Boarding,
    Departed,
    InFlight,
    Landed,
    Arrived,
    Cancelled,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 9] = [
        FlightStatus::Scheduled,
        FlightStatus::OnTime,
        FlightStatus::Delayed,
        FlightStatus::Boarding,
        FlightStatus::Departed,
        FlightStatus::InFlight,
        FlightStatus::Landed,
        FlightStatus::Arrived,
        FlightStatus::Cancelled,
    ];

    /// Wire representation, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::OnTime => "on-time",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Boarding => "boarding",
            FlightStatus::Departed => "departed",
            FlightStatus::InFlight => "in-flight",
            FlightStatus::Landed => "landed",
            FlightStatus::Arrived => "arrived",
            FlightStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for FlightStatus {
    fn valid_transitions(&self) -> &'static [Self] {
        use FlightStatus::*;
        match self {
            Scheduled => &[OnTime, Delayed, Cancelled],
            OnTime => &[Delayed, Boarding, Cancelled],
            Delayed => &[OnTime, Boarding, Cancelled],
            Boarding => &[Departed, Delayed, Cancelled],
            Departed => &[InFlight],
            InFlight => &[Landed],
            Landed => &[Arrived],
            Arrived | Cancelled => &[],
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
