//! Flight command and query handlers.

mod change_flight_status;
mod delete_flight;
mod list_flights;
mod register_flight;
mod update_flight_times;

pub use change_flight_status::{
    ChangeFlightStatusCommand, ChangeFlightStatusHandler, ChangeFlightStatusResult,
};
pub use delete_flight::{DeleteFlightCommand, DeleteFlightHandler};
pub use list_flights::{ListFlightsHandler, ListFlightsQuery};
pub use register_flight::{RegisterFlightCommand, RegisterFlightHandler, RegisterFlightResult};
pub use update_flight_times::{UpdateFlightTimesCommand, UpdateFlightTimesHandler};
