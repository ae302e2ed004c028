//! UI layer: HTTP / WebSocket endpoints and background tasks.

pub mod handler;
mod server;
mod signal;
pub mod state;
pub mod task;

pub use server::Server;
pub use signal::shutdown_signal;
pub use state::AppState;
