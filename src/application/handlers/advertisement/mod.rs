//! Advertisement command and query handlers.

mod delete_advertisement;
mod list_active_advertisements;
mod record_advertisement_view;
mod save_advertisement;
mod set_emergency_mode;

pub use delete_advertisement::{DeleteAdvertisementCommand, DeleteAdvertisementHandler};
pub use list_active_advertisements::{
    ListActiveAdvertisementsHandler, ListActiveAdvertisementsQuery,
};
pub use record_advertisement_view::{
    RecordAdvertisementViewCommand, RecordAdvertisementViewHandler,
};
pub use save_advertisement::{
    SaveAdvertisementCommand, SaveAdvertisementHandler, SaveAdvertisementResult,
};
pub use set_emergency_mode::{SetEmergencyModeCommand, SetEmergencyModeHandler};
