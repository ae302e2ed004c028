//! Donation alert relay hub.
//!
//! Receives donation alerts and heartbeats from overlay scripts over
//! WebSocket, keeps an append-only donation ledger on disk, and broadcasts
//! `"reset"` to every connected display when the ledger is reset manually or
//! by the daily scheduler.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
