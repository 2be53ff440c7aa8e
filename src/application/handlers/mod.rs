//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod advertisement;
pub mod flight;
pub mod reference;

pub use advertisement::{
    DeleteAdvertisementCommand, DeleteAdvertisementHandler, ListActiveAdvertisementsHandler,
    ListActiveAdvertisementsQuery, RecordAdvertisementViewCommand,
    RecordAdvertisementViewHandler, SaveAdvertisementCommand, SaveAdvertisementHandler,
    SaveAdvertisementResult, SetEmergencyModeCommand, SetEmergencyModeHandler,
};
pub use flight::{
    ChangeFlightStatusCommand, ChangeFlightStatusHandler, ChangeFlightStatusResult,
    DeleteFlightCommand, DeleteFlightHandler, ListFlightsHandler, ListFlightsQuery,
    RegisterFlightCommand, RegisterFlightHandler, RegisterFlightResult, UpdateFlightTimesCommand,
    UpdateFlightTimesHandler,
};
pub use reference::{NotifyReferenceChangeCommand, NotifyReferenceChangeHandler};
