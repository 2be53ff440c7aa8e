//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Hub-side handlers are split into commands (write) and queries (read);
//! the display side runs the [`AdRotationEngine`] on [`ScheduledTask`]s.

pub mod flight_board;
pub mod handlers;
pub mod rotation_engine;
pub mod scheduled_task;

pub use flight_board::FlightBoard;
pub use handlers::*;
pub use rotation_engine::{AdRotationEngine, LayoutCallback, RotationSettings, RotationSnapshot};
pub use scheduled_task::ScheduledTask;
