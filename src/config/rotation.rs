//! Ad rotation timing

use serde::Deserialize;
use std::time::Duration;

use crate::application::RotationSettings;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RotationConfig {
    /// Pause between two plays of a lone ad, in seconds
    #[serde(default = "default_rest_secs")]
    pub rest_secs: u32,

    /// Reconciliation refetch period
    #[serde(default = "default_refetch_secs")]
    pub refetch_secs: u64,

    /// Countdown step
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl RotationConfig {
    pub fn refetch_period(&self) -> Duration {
        Duration::from_secs(self.refetch_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn settings(&self) -> RotationSettings {
        RotationSettings {
            rest_secs: self.rest_secs,
            refetch_period: self.refetch_period(),
            tick: self.tick(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.refetch_secs == 0 {
            return Err(ValidationError::ZeroDuration("refetch_secs"));
        }
        if self.tick_ms == 0 {
            return Err(ValidationError::ZeroDuration("tick_ms"));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            rest_secs: default_rest_secs(),
            refetch_secs: default_refetch_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_rest_secs() -> u32 {
    10
}

fn default_refetch_secs() -> u64 {
    60
}

fn default_tick_ms() -> u64 {
    1000
}
