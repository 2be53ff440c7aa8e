//! Realtime hub adapters.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    InMemoryEventBus                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │ subscribes
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    RealtimeHub                                       │
//! │   - Routes each envelope to airport topics and/or global            │
//! │   - Picks the scoped or `:global` event name                        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │ broadcasts
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   airport:CDG          airport:ORY          global                  │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     ▲ join/leave
//!                                     │
//!                  ClientSession (websocket or in-process link)
//! ```
//!
//! # Components
//!
//! - [`rooms`] - topic membership and non-blocking broadcast
//! - [`hub`] - event routing
//! - [`session`] - per-client control protocol
//! - [`ws_handler`] - axum WebSocket endpoint
//! - [`in_process`] - channel-backed connector for single-process use

pub mod hub;
pub mod in_process;
pub mod rooms;
pub mod session;
pub mod ws_handler;

pub use hub::RealtimeHub;
pub use in_process::InProcessConnector;
pub use rooms::{ClientId, RoomManager};
pub use session::{serve_channel, ClientSession, ControlRequest};
pub use ws_handler::{realtime_router, ws_handler, RealtimeState};
