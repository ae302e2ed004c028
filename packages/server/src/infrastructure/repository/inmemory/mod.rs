//! In-memory repositories.

pub mod registry;

pub use registry::InMemoryConnectionRegistry;
