//! Registration use case
//!
//! Drives a configured producer through capability refresh, register,
//! modify-registration and deregister. Every outcome is persisted through the
//! consumer registry so the stored status always matches the last answer we
//! got from the producer.

use std::sync::Arc;

use super::consumers::{ConsumerRegistry, RegistryError};
use crate::domain::entities::{
    ProducerInfo, RefreshResult, RegistrationContext, RegistrationError,
};
use crate::domain::ports::{EndpointError, ProducerEndpoint, RegistrationData};
use crate::domain::value_objects::{QName, RegistrationStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationFlowError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("producer '{id}' does not require registration")]
    NotRequired { id: String },

    #[error("producer '{id}' is already registered")]
    AlreadyRegistered { id: String },
}

/// How this consumer presents itself to producers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerIdentity {
    pub name: String,
    pub agent: String,
}

impl Default for ConsumerIdentity {
    fn default() -> Self {
        Self {
            name: "wsrp-consumer".to_string(),
            agent: format!("wsrp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct RegistrationManager {
    registry: Arc<ConsumerRegistry>,
    identity: ConsumerIdentity,
}

impl RegistrationManager {
    pub fn new(registry: Arc<ConsumerRegistry>, identity: ConsumerIdentity) -> Self {
        Self { registry, identity }
    }

    pub fn identity(&self) -> &ConsumerIdentity {
        &self.identity
    }

    fn consumer(&self, id: &str) -> Result<ProducerInfo, RegistrationFlowError> {
        self.registry
            .get_consumer(id)?
            .ok_or_else(|| RegistryError::UnknownConsumer { id: id.to_string() }.into())
    }

    fn persist(&self, info: &mut ProducerInfo) -> Result<(), RegistrationFlowError> {
        self.registry.update_producer_info(info)?;
        Ok(())
    }

    fn registration_data(&self, info: &ProducerInfo) -> RegistrationData {
        RegistrationData {
            consumer_name: self.identity.name.clone(),
            consumer_agent: self.identity.agent.clone(),
            properties: info.registration().property_values(),
        }
    }

    /// Ask the producer what it expects and reconcile local state with it.
    ///
    /// A producer that no longer recognizes our registration is treated as a
    /// deregistration, and its description is fetched again anonymously.
    pub fn refresh(
        &self,
        id: &str,
        endpoint: &dyn ProducerEndpoint,
    ) -> Result<RefreshResult, RegistrationFlowError> {
        let mut info = self.consumer(id)?;

        let description = match endpoint.service_description(info.registration().context()) {
            Err(EndpointError::InvalidRegistration { message })
                if info.registration().context().is_some() =>
            {
                tracing::warn!(id = %id, reason = %message, "producer dropped our registration");
                info.registration_mut().deregistered();
                endpoint.service_description(None)?
            }
            other => other?,
        };

        let result = info.registration_mut().refresh(&description);
        if !result.missing.is_empty() || !result.extra.is_empty() {
            tracing::info!(
                id = %id,
                missing = result.missing.len(),
                extra = result.extra.len(),
                "registration properties differ from producer requirements"
            );
        }
        self.persist(&mut info)?;
        Ok(result)
    }

    /// Set a property value to send with the next register or modify call
    pub fn set_property(
        &self,
        id: &str,
        name: QName,
        value: impl Into<String>,
    ) -> Result<RegistrationStatus, RegistrationFlowError> {
        let mut info = self.consumer(id)?;
        info.registration_mut().set_property_value(name, value)?;
        self.persist(&mut info)?;
        Ok(info.registration().status())
    }

    pub fn register(
        &self,
        id: &str,
        endpoint: &dyn ProducerEndpoint,
    ) -> Result<RegistrationContext, RegistrationFlowError> {
        let mut info = self.consumer(id)?;
        if !info.registration().is_registration_required()? {
            return Err(RegistrationFlowError::NotRequired { id: id.to_string() });
        }
        if info.registration().context().is_some() {
            return Err(RegistrationFlowError::AlreadyRegistered { id: id.to_string() });
        }

        let context = endpoint.register(&self.registration_data(&info))?;
        info.registration_mut().registration_succeeded(context.clone());
        self.persist(&mut info)?;
        tracing::info!(id = %id, handle = %context.handle, "registered with producer");
        Ok(context)
    }

    /// Push locally modified properties to the producer
    pub fn modify_registration(
        &self,
        id: &str,
        endpoint: &dyn ProducerEndpoint,
    ) -> Result<RegistrationContext, RegistrationFlowError> {
        let mut info = self.consumer(id)?;
        let current = info
            .registration()
            .context()
            .cloned()
            .ok_or(RegistrationError::NotRegistered)?;

        let context = endpoint.modify_registration(&current, &self.registration_data(&info))?;
        info.registration_mut().registration_succeeded(context.clone());
        self.persist(&mut info)?;
        tracing::info!(id = %id, "registration modified");
        Ok(context)
    }

    pub fn deregister(
        &self,
        id: &str,
        endpoint: &dyn ProducerEndpoint,
    ) -> Result<(), RegistrationFlowError> {
        let mut info = self.consumer(id)?;
        let context = info
            .registration()
            .context()
            .cloned()
            .ok_or(RegistrationError::NotRegistered)?;

        endpoint.deregister(&context)?;
        info.registration_mut().deregistered();
        self.persist(&mut info)?;
        tracing::info!(id = %id, "deregistered from producer");
        Ok(())
    }
}
