//! Registry errors

use crate::domain::ports::StoreError;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry is unchanged when this is returned
    #[error("a producer with id '{id}' already exists")]
    DuplicateIdentity { id: String },

    #[error("consumer registry is not started")]
    NotStarted,

    #[error("no producer with id '{id}'")]
    UnknownConsumer { id: String },

    #[error("'{id}' is not a valid producer id")]
    InvalidId { id: String },

    /// The copy handed in is older than the stored record
    #[error("producer '{id}' was changed since it was loaded, reload it and try again")]
    Conflict { id: String },

    #[error("consumer store failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::IdTaken { id } => RegistryError::DuplicateIdentity { id },
            other => RegistryError::Store(other),
        }
    }
}
