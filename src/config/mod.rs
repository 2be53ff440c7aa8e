//! Application configuration module
//!
//! Configuration is read from environment variables with the `FLIGHT_BOARD`
//! prefix; nested values use double underscores as separators. Every section
//! has defaults, so an empty environment yields a working local setup.
//!
//! # Example
//!
//! ```no_run
//! use flight_board::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! println!("Hub listening on {:?}", config.server.socket_addr());
//! ```

mod client;
mod error;
mod realtime;
mod rotation;
mod server;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use realtime::RealtimeConfig;
pub use rotation::RotationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root configuration shared by the hub server and the display binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Hub HTTP and websocket listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Hub fanout
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Display connection to the hub
    #[serde(default)]
    pub client: ClientConfig,

    /// Display ad rotation timing
    #[serde(default)]
    pub rotation: RotationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables, then validate it.
    ///
    /// A `.env` file is read first when present.
    ///
    /// - `FLIGHT_BOARD__SERVER__PORT=9000` -> `server.port = 9000`
    /// - `FLIGHT_BOARD__CLIENT__AIRPORT=JFK` -> `client.airport = "JFK"`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FLIGHT_BOARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.realtime.validate()?;
        self.client.validate()?;
        self.rotation.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
