//! Domain Entities
//!
//! Core domain entities that have identity and lifecycle.
//! - `ProducerInfo` - A configured connection to a remote producer
//! - `RegistrationInfo` - Consumer-side registration state machine
//! - `RegistrationRequirements` - Producer-side property declarations
//! - `ProducerSessionInformation` - Remote session tokens for one session
//! - `ExportInfo` - A migration export bundle

mod export;
mod producer;
mod property;
mod registration;
mod requirements;
mod service_description;
mod session;

pub use export::ExportInfo;
pub use producer::{EndpointConfiguration, ProducerInfo};
pub use property::{
    xsd_string, PropertyChange, PropertyChangeListener, PropertyDescriptionData, PropertyError,
    RegistrationPropertyDescription, XSD_NAMESPACE,
};
pub use registration::{
    PropertyStatus, RefreshResult, RegistrationContext, RegistrationError, RegistrationInfo,
    RegistrationProperty,
};
pub use requirements::RegistrationRequirements;
pub use service_description::ServiceDescription;
pub use session::{PortletSession, ProducerSessionInformation};
