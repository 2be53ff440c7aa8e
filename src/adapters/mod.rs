//! Adapters - Implementations of port interfaces.
//!
//! - `events` - In-process event bus
//! - `memory` - In-memory flight and advertisement stores
//! - `realtime` - Hub side of the realtime channel
//! - `client` - Display side: connection, subscriptions, HTTP API client
//! - `http` - REST API served by the hub

pub mod client;
pub mod events;
pub mod http;
pub mod memory;
pub mod realtime;

pub use events::InMemoryEventBus;
