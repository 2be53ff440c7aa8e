//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the event envelope
//! that form the vocabulary of the flight board domain.

mod command;
mod errors;
mod events;
mod ids;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{AdvertisementId, AirportCode, FlightId};
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
