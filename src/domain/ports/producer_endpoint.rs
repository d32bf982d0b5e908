//! ProducerEndpoint port
//!
//! The remote calls registration depends on. Transport, timeouts and retries
//! are the implementor's business.

use std::collections::BTreeMap;

use crate::domain::entities::{RegistrationContext, ServiceDescription};
use crate::domain::value_objects::QName;

/// What a consumer sends when registering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationData {
    pub consumer_name: String,
    pub consumer_agent: String,
    pub properties: BTreeMap<QName, String>,
}

pub trait ProducerEndpoint: Send + Sync {
    fn service_description(
        &self,
        registration: Option<&RegistrationContext>,
    ) -> Result<ServiceDescription, EndpointError>;

    fn register(&self, data: &RegistrationData) -> Result<RegistrationContext, EndpointError>;

    fn modify_registration(
        &self,
        context: &RegistrationContext,
        data: &RegistrationData,
    ) -> Result<RegistrationContext, EndpointError>;

    fn deregister(&self, context: &RegistrationContext) -> Result<(), EndpointError>;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("producer unreachable: {message}")]
    Unreachable { message: String },

    #[error("producer rejected registration: {message}")]
    InvalidRegistration { message: String },

    #[error("producer call failed: {message}")]
    OperationFailed { message: String },
}
