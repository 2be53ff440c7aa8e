//! Screen layout driven by the ad rotation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the board shares the screen with advertising.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    NoAd,
    HalfScreen,
    FullScreen,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayoutMode::NoAd => "no-ad",
            LayoutMode::HalfScreen => "half-screen",
            LayoutMode::FullScreen => "full-screen",
        };
        write!(f, "{}", s)
    }
}

/// Suppresses repeated layout notifications.
///
/// Starts in an unknown state, so the first observation is always reported,
/// `NoAd` included.
#[derive(Debug, Clone, Default)]
pub struct LayoutTracker {
    current: Option<LayoutMode>,
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported mode; `None` until the first observation.
    pub fn current(&self) -> Option<LayoutMode> {
        self.current
    }

    /// Record `mode`, returning it only if it differs from the last one.
    pub fn observe(&mut self, mode: LayoutMode) -> Option<LayoutMode> {
        if self.current == Some(mode) {
            return None;
        }
        self.current = Some(mode);
        Some(mode)
    }

    /// Forget the last mode, e.g. when a new display session starts.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
