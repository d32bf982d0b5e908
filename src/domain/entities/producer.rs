//! Producer entity
//!
//! One configured connection to a remote producer. The `id` is what users see
//! and may be renamed; the persistent key is the storage identity and never
//! changes once a store has assigned it. The revision counts accepted
//! writes and lets the registry spot a copy that went stale.

use serde::{Deserialize, Serialize};

use super::registration::RegistrationInfo;

/// Connection parameters for a producer endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wsdl_url: Option<String>,
    /// Seconds a cached service description stays fresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_expiration: Option<u32>,
}

impl EndpointConfiguration {
    pub fn new(wsdl_url: Option<String>, cache_expiration: Option<u32>) -> Self {
        Self {
            wsdl_url,
            cache_expiration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProducerInfo {
    id: String,
    persistent_key: Option<String>,
    endpoint: EndpointConfiguration,
    registration: RegistrationInfo,
    active: bool,
    revision: u64,
}

impl ProducerInfo {
    /// A new, never persisted connection with undetermined registration
    pub fn new(id: impl Into<String>, endpoint: EndpointConfiguration) -> Self {
        Self {
            id: id.into(),
            persistent_key: None,
            endpoint,
            registration: RegistrationInfo::new(),
            active: false,
            revision: 0,
        }
    }

    /// Rebuild a connection from a store record
    pub fn restore(
        id: impl Into<String>,
        persistent_key: impl Into<String>,
        endpoint: EndpointConfiguration,
        registration: RegistrationInfo,
        active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            persistent_key: Some(persistent_key.into()),
            endpoint,
            registration,
            active,
            revision: 0,
        }
    }

    /// Set the revision a store record was written at
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Change the user-facing id. Takes effect in a registry on the next
    /// `update_producer_info`.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn persistent_key(&self) -> Option<&str> {
        self.persistent_key.as_deref()
    }

    /// Record the key a store assigned. A key, once set, is never replaced.
    pub(crate) fn assign_persistent_key(&mut self, key: impl Into<String>) {
        if self.persistent_key.is_none() {
            self.persistent_key = Some(key.into());
        }
    }

    pub fn endpoint(&self) -> &EndpointConfiguration {
        &self.endpoint
    }

    pub fn endpoint_mut(&mut self) -> &mut EndpointConfiguration {
        &mut self.endpoint
    }

    pub fn registration(&self) -> &RegistrationInfo {
        &self.registration
    }

    pub fn registration_mut(&mut self) -> &mut RegistrationInfo {
        &mut self.registration
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Number of writes the registry accepted for this connection
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }
}
