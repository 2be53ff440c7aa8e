//! Reference-data notification handlers.

mod notify_reference_change;

pub use notify_reference_change::{NotifyReferenceChangeCommand, NotifyReferenceChangeHandler};
