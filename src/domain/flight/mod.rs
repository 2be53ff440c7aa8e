//! Flight module - flight records, their lifecycle and board visibility.
//!
//! # Module Structure
//!
//! - `aggregate` - `Flight` entity, `FlightType`, creation/update inputs
//! - `status` - `FlightStatus` and its transition table
//! - `errors` - `FlightError`
//! - `events` - flight domain events
//! - `visibility` - the board filter and sort

mod aggregate;
mod errors;
mod events;
mod status;
pub mod visibility;

pub use aggregate::{Flight, FlightTimesUpdate, FlightType, NewFlight};
#[cfg(test)]
pub(crate) use aggregate::test_support;
pub use errors::FlightError;
pub use events::{FlightCreated, FlightDeleted, FlightStatusChanged, FlightUpdated};
pub use status::FlightStatus;
pub use visibility::{is_visible, visible_flights};
