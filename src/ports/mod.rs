//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Storage Ports
//!
//! - `FlightRepository` - Flight records
//! - `AdvertisementRepository` - Ads and the emergency override
//!
//! ## Display Ports
//!
//! - `DisplayApi` - Request/response operations displays consume
//! - `ChannelConnector` - Opens a realtime link to the hub

mod advertisement_repository;
mod channel_connector;
mod display_api;
mod event_publisher;
mod event_subscriber;
mod flight_repository;

pub use advertisement_repository::AdvertisementRepository;
pub use channel_connector::{ChannelConnector, ChannelLink, TransportError};
pub use display_api::{ActiveAdvertisements, DisplayApi, DisplayApiError, FlightList};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use flight_repository::FlightRepository;
