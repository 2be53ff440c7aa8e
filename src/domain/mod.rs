//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events, state machines)
//! - `realtime` - Topics, event kinds and the wire frame
//! - `flight` - Flight records, lifecycle state machine and board visibility
//! - `advertisement` - Ads, eligibility and the rotation model
//! - `reference` - Airport and airline change notifications

pub mod advertisement;
pub mod flight;
pub mod foundation;
pub mod realtime;
pub mod reference;
