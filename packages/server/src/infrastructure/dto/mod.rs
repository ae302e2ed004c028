//! Data Transfer Objects (DTOs) for the donation relay.
//!
//! DTOs are organized by purpose:
//! - `snapshot`: persisted donation records (also served over HTTP)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod snapshot;
