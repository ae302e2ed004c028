//! Domain errors.

use thiserror::Error;

/// Malformed donation text.
///
/// Never propagates past the connection handler: the message is logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at least 5 fields separated by \" - \", got {0}")]
    InsufficientFields(usize),

    #[error("no amount found in '{0}'")]
    MissingAmount(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("amount '{0}' exceeds the largest supported value")]
    AmountOutOfRange(String),
}

/// Failure to push a message to a single connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
