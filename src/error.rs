//! Error types for wsrp
//!
//! Each port and module has its own `thiserror` enum; `WsrpError` gathers
//! them for callers that drive several parts at once.

use thiserror::Error;

use crate::application::{RegistrationFlowError, RegistryError};
use crate::config::ConfigError;
use crate::domain::entities::{PropertyError, RegistrationError};
use crate::domain::ports::{EndpointError, StoreError};
use crate::domain::services::{DecodeError, ExportDataError};
use crate::domain::value_objects::QNameError;

/// Result type alias for wsrp operations
pub type WsrpResult<T> = Result<T, WsrpError>;

#[derive(Error, Debug)]
pub enum WsrpError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    RegistrationFlow(#[from] RegistrationFlowError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("invalid export data: {0}")]
    Decode(#[from] DecodeError),

    #[error("cannot build export data: {0}")]
    ExportData(#[from] ExportDataError),

    #[error("invalid qualified name: {0}")]
    QName(#[from] QNameError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WsrpError {
    /// Whether retrying after a capability refresh could succeed
    pub fn needs_refresh(&self) -> bool {
        matches!(
            self,
            WsrpError::Registration(RegistrationError::RefreshRequired)
                | WsrpError::RegistrationFlow(RegistrationFlowError::Registration(
                    RegistrationError::RefreshRequired
                ))
        )
    }
}
