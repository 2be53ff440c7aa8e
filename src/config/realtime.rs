//! Realtime hub configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Hub fanout settings
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Frames queued per client before broadcasts to it are dropped
    #[serde(default = "default_client_buffer")]
    pub client_buffer: usize,
}

impl RealtimeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.client_buffer == 0 {
            return Err(ValidationError::InvalidBuffer);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            client_buffer: default_client_buffer(),
        }
    }
}

fn default_client_buffer() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buffer_is_rejected() {
        let config = RealtimeConfig { client_buffer: 0 };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBuffer));
        assert!(RealtimeConfig::default().validate().is_ok());
    }
}
