//! Display-side adapters.
//!
//! - [`connection`] - the single reconnecting link to the hub
//! - [`subscriptions`] - per-consumer listener ownership
//! - [`ws_connector`] - WebSocket transport
//! - [`http_api`] - HTTP implementation of the display API

pub mod connection;
pub mod http_api;
pub mod subscriptions;
pub mod ws_connector;

pub use connection::{
    ConnectionError, ConnectionManager, ConnectionSettings, ConnectionState, Listener, ListenerId,
};
pub use http_api::HttpDisplayApi;
pub use subscriptions::Subscriptions;
pub use ws_connector::WsConnector;
