//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Client buffer must be at least 1")]
    InvalidBuffer,

    #[error("Reconnect attempts must be at least 1")]
    InvalidReconnectAttempts,

    #[error("Invalid airport code: {0}")]
    InvalidAirport(String),

    #[error("{field} must use one of: {schemes}")]
    InvalidUrlScheme {
        field: &'static str,
        schemes: &'static str,
    },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}
