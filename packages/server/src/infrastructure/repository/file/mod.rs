//! Flat-file repositories.

pub mod error;
pub mod ledger;

pub use error::StorageError;
pub use ledger::{FileLedgerRepository, LedgerPaths};
