//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `stores/` - Consumer store implementations (TOML file, in-memory)

pub mod stores;

// Re-export for convenience
pub use stores::{default_store_path, InMemoryConsumerStore, TomlConsumerStore};
