//! Storage errors of the flat-file ledger.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Snapshot or audit log could not be read or written.
///
/// Always logged and absorbed by the ledger: the in-memory sequence stays
/// authoritative.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("malformed snapshot {}: {source}", .path.display())]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid date '{date}' in snapshot record: {source}")]
    InvalidDate {
        date: String,
        source: chrono::ParseError,
    },
}
