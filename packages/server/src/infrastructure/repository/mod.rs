//! Repository implementations.

pub mod file;
pub mod inmemory;

pub use file::{FileLedgerRepository, LedgerPaths, StorageError};
pub use inmemory::InMemoryConnectionRegistry;
