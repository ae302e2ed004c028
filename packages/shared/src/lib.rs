//! Shared utilities for the donation relay.

pub mod logger;
pub mod time;
