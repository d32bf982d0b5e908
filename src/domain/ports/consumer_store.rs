//! ConsumerStore port
//!
//! Persistence of configured producer connections. A store maps persistent
//! keys to records and refuses to hold two records under one producer id,
//! so registries sharing a backend cannot both claim the same id.

use std::path::PathBuf;

use crate::domain::entities::ProducerInfo;

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ConsumerStore: Send + Sync {
    /// Acquire whatever handle the backend needs
    fn start(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Release the backend handle
    fn stop(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Persist a new connection and return the persistent key assigned to it.
    ///
    /// Fails with [`StoreError::IdTaken`] if another record uses the id.
    fn save(&self, info: &ProducerInfo) -> StoreResult<String>;

    /// Persist a known connection; returns the id it was stored under if that changed.
    ///
    /// Fails with [`StoreError::IdTaken`] if another record uses the id.
    fn update(&self, info: &ProducerInfo) -> StoreResult<Option<String>>;

    fn delete(&self, info: &ProducerInfo) -> StoreResult<()>;

    fn load_all(&self) -> StoreResult<Vec<ProducerInfo>>;

    fn load_by_persistent_key(&self, key: &str) -> StoreResult<Option<ProducerInfo>>;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Failed to access consumer store: {message}")]
    AccessError { message: String },

    #[error("Failed to serialize consumer store: {message}")]
    SerializationError { message: String },

    #[error(
        "consumer store corrupted: {path}\n  → Fix: restore a backup or delete the file\n  → Details: {message}"
    )]
    Corrupted { path: PathBuf, message: String },

    #[error("producer '{id}' has no persistent key, it was never saved")]
    Unsaved { id: String },

    #[error("no stored producer under persistent key '{key}'")]
    UnknownKey { key: String },

    #[error("producer id '{id}' is already stored under another key")]
    IdTaken { id: String },
}
