//! Reference data (airports, airlines) as seen by the realtime core.

mod events;

pub use events::{AirlineChanged, AirportChanged, ReferenceAction};
