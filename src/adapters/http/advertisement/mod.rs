//! HTTP adapter for advertisement endpoints.
//!
//! - `GET /api/advertisements/active` - Ads a display may rotate
//! - `POST /api/advertisements/:id/view` - Count one play
//! - `PUT /api/advertisements` - Create or update
//! - `DELETE /api/advertisements/:id` - Remove
//! - `PUT /api/advertisements/emergency` - Set or clear the override

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::advertisement_routes;
