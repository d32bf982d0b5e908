//! wsrp - registration, session and migration engine for WSRP portals
//!
//! A consumer portal keeps a registry of remote producers, tracks whether it
//! is registered with each of them, correlates its own sessions with the
//! producers' sessions, and moves portlet state between producers through a
//! versioned binary export format.
//!
//! ## Layers
//!
//! - `domain` - Entities, value objects, ports and the export codec
//! - `application` - Consumer registry, registration flow, sessions, migration
//! - `infrastructure` - Consumer store implementations
//! - `config` - TOML configuration with `WSRP_*` overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    ConsumerIdentity, ConsumerRegistry, MigrationService, RegistrationFlowError,
    RegistrationManager, RegistryError, SessionHandler, SessionRegistry,
};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{
    EndpointConfiguration, ExportInfo, ProducerInfo, ProducerSessionInformation,
    RegistrationInfo, RegistrationPropertyDescription, RegistrationRequirements,
};
pub use domain::ports::{ConsumerStore, PortletInvocation, ProducerEndpoint, StoreError};
pub use domain::services::{get_internal_bytes, wrap_internal_bytes, DecodeError, ExportPortletData};
pub use domain::value_objects::{QName, RegistrationStatus};
pub use error::{WsrpError, WsrpResult};
pub use infrastructure::{InMemoryConsumerStore, TomlConsumerStore};
