//! Flight Board - realtime core for airport flight-information displays
//!
//! The hub relays flight, reference-data and advertisement events to the
//! displays subscribed to an airport or to the global topic. Displays keep a
//! live connection, filter their flight board and rotate advertisements.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
