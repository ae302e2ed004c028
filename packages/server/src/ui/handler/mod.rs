//! Request handlers.

mod http;
mod websocket;

pub use http::{RESET_CONFIRMATION, get_channels, get_donations, health_check, reset_handler};
pub use websocket::websocket_handler;
