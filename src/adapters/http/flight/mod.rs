//! HTTP adapter for flight endpoints.
//!
//! - `GET /api/flights` - Flights listed at an airport
//! - `POST /api/flights` - Register a flight, optionally linked
//! - `PATCH /api/flights/:id` - Update estimated/actual times
//! - `PATCH /api/flights/:id/status` - Authoritative status transition
//! - `DELETE /api/flights/:id` - Remove a flight

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::flight_routes;
