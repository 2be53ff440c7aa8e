//! Rotation state: which ad is on screen and for how long.
//!
//! The state is advanced one second at a time by [`RotationState::tick`].
//! It owns no timer; the application layer drives it.

use crate::domain::foundation::AdvertisementId;

use super::{Advertisement, LayoutMode};

/// Pause inserted between two plays of a lone ad.
pub const DEFAULT_REST_SECS: u32 = 10;

/// Where the rotation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPhase {
    /// No eligible ads.
    Idle,
    /// Showing the ad at `index`.
    Playing { index: usize },
    /// Pausing before replaying a lone ad.
    Resting,
}

/// Ordered eligible ads plus the countdown for the current phase.
#[derive(Debug, Clone)]
pub struct RotationState {
    ads: Vec<Advertisement>,
    phase: RotationPhase,
    time_left: u32,
    rest_secs: u32,
}

impl RotationState {
    pub fn new(rest_secs: u32) -> Self {
        Self {
            ads: Vec::new(),
            phase: RotationPhase::Idle,
            time_left: 0,
            rest_secs,
        }
    }

    pub fn phase(&self) -> RotationPhase {
        self.phase
    }

    pub fn ads(&self) -> &[Advertisement] {
        &self.ads
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_idle(&self) -> bool {
        self.phase == RotationPhase::Idle
    }

    pub fn is_resting(&self) -> bool {
        self.phase == RotationPhase::Resting
    }

    /// Index of the ad on screen, if any.
    pub fn index(&self) -> Option<usize> {
        match self.phase {
            RotationPhase::Playing { index } => Some(index),
            _ => None,
        }
    }

    /// The ad on screen, if any.
    pub fn current(&self) -> Option<&Advertisement> {
        self.index().and_then(|i| self.ads.get(i))
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.current()
            .map(|ad| ad.display_mode().layout())
            .unwrap_or(LayoutMode::NoAd)
    }

    /// Swap in a freshly fetched eligible list.
    ///
    /// An unchanged ordered id list keeps the running countdown. Any other
    /// list restarts at index 0. Returns the ad that started playing.
    pub fn replace(&mut self, ads: Vec<Advertisement>) -> Option<AdvertisementId> {
        let unchanged = !self.is_idle()
            && ads.len() == self.ads.len()
            && ads.iter().zip(&self.ads).all(|(a, b)| a.id() == b.id());
        self.ads = ads;

        if unchanged {
            return None;
        }
        if self.ads.is_empty() {
            self.phase = RotationPhase::Idle;
            self.time_left = 0;
            return None;
        }
        Some(self.play(0))
    }

    /// Drop every ad and stop.
    pub fn clear(&mut self) {
        self.ads.clear();
        self.phase = RotationPhase::Idle;
        self.time_left = 0;
    }

    /// Advance one second. Returns the ad that started playing, if any.
    pub fn tick(&mut self) -> Option<AdvertisementId> {
        match self.phase {
            RotationPhase::Idle => None,
            RotationPhase::Playing { index } => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left > 0 {
                    return None;
                }
                if self.ads.len() > 1 {
                    Some(self.play((index + 1) % self.ads.len()))
                } else if self.rest_secs > 0 {
                    self.phase = RotationPhase::Resting;
                    self.time_left = self.rest_secs;
                    None
                } else {
                    Some(self.play(0))
                }
            }
            RotationPhase::Resting => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left > 0 {
                    return None;
                }
                Some(self.play(0))
            }
        }
    }

    fn play(&mut self, index: usize) -> AdvertisementId {
        let ad = &self.ads[index];
        self.phase = RotationPhase::Playing { index };
        self.time_left = ad.duration_secs();
        ad.id()
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECS)
    }
}
