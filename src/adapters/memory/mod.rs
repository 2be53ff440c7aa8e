//! In-memory repositories.
//!
//! The hub keeps its working set in process. Records live as long as the
//! server does.

mod advertisement_repository;
mod flight_repository;

pub use advertisement_repository::InMemoryAdvertisementRepository;
pub use flight_repository::InMemoryFlightRepository;
