//! Event bus adapters.
//!
//! - `InMemoryEventBus` - in-process bus; the hub subscribes to it for fanout

mod in_memory;

pub use in_memory::InMemoryEventBus;
