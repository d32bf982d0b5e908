//! Consumer Store Implementations
//!
//! Concrete implementations of the `ConsumerStore` port.

mod memory;
mod toml_store;

pub use memory::InMemoryConsumerStore;
pub use toml_store::{default_store_path, TomlConsumerStore};
