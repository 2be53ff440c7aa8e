//! Display client configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::client::ConnectionSettings;
use crate::domain::flight::FlightType;
use crate::domain::foundation::AirportCode;

use super::error::ValidationError;

/// Where a display connects and how it recovers
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the hub's HTTP API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Hub websocket endpoint
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Airport this display serves
    #[serde(default = "default_airport")]
    pub airport: String,

    /// `departure` or `arrival`; unset shows both
    #[serde(default)]
    pub flight_type: Option<FlightType>,

    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// Retries after the first failed attempt before giving up
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    pub fn airport_code(&self) -> Result<AirportCode, ValidationError> {
        AirportCode::new(&self.airport)
            .map_err(|_| ValidationError::InvalidAirport(self.airport.clone()))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            reconnect_delay: self.reconnect_delay(),
            max_reconnect_attempts: self.max_reconnect_attempts,
            ping_timeout: self.ping_timeout(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrlScheme {
                field: "api_base_url",
                schemes: "http, https",
            });
        }
        if !self.ws_url.starts_with("ws://") && !self.ws_url.starts_with("wss://") {
            return Err(ValidationError::InvalidUrlScheme {
                field: "ws_url",
                schemes: "ws, wss",
            });
        }
        self.airport_code()?;
        if self.max_reconnect_attempts == 0 {
            return Err(ValidationError::InvalidReconnectAttempts);
        }
        if self.ping_timeout_ms == 0 {
            return Err(ValidationError::ZeroDuration("ping_timeout_ms"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ws_url: default_ws_url(),
            airport: default_airport(),
            flight_type: None,
            reconnect_delay_ms: default_reconnect_delay_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            ping_timeout_ms: default_ping_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:8080/ws".to_string()
}

fn default_airport() -> String {
    "CDG".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_ping_timeout_ms() -> u64 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    10
}
