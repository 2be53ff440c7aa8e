//! Advertisement module - ads, their eligibility and the rotation model.
//!
//! - `aggregate` - `Advertisement` with window, scope and quota rules
//! - `events` - create/update/delete events
//! - `rotation` - the pure countdown state the display engine drives
//! - `layout` - layout modes and change suppression

mod aggregate;
mod events;
mod layout;
mod rotation;

pub use aggregate::{rotation_order, Advertisement, AdvertisementDraft, DisplayMode, MediaType};
#[cfg(test)]
pub(crate) use aggregate::test_support;
pub use events::{AdvertisementCreated, AdvertisementDeleted, AdvertisementUpdated};
pub use layout::{LayoutMode, LayoutTracker};
pub use rotation::{RotationPhase, RotationState, DEFAULT_REST_SECS};
