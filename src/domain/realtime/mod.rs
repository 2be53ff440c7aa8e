//! Realtime vocabulary shared by the hub and its clients.
//!
//! - [`topic`] - broadcast scopes (`airport:<CODE>`, `global`) and control event names
//! - [`event_kind`] - domain event kinds and their channel names
//! - [`frame`] - the JSON frame exchanged over the channel

pub mod event_kind;
pub mod frame;
pub mod topic;

pub use event_kind::{EventFamily, EventKind, UnknownEventKind};
pub use frame::WireFrame;
pub use topic::{control, Topic};
