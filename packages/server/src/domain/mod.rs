//! Domain layer: donation and connection models, the inbound text protocol,
//! and the interfaces the outer layers implement.

pub mod deduplicator;
pub mod entity;
pub mod error;
pub mod parser;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use deduplicator::{DUPLICATE_WINDOW_SECS, is_burst_duplicate};
pub use entity::{AppendOutcome, ChannelStatus, ClearOutcome, ConnectionTable, Donation, Ledger};
pub use error::{MessagePushError, ParseError};
pub use parser::{InboundMessage, classify, parse_donation};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::{ConnectionRegistry, DonationRepository};
pub use value_object::{ChannelName, ConnectionId, DEFAULT_CHANNEL, RESET_MESSAGE};

#[cfg(test)]
pub use pusher::MockMessagePusher;
