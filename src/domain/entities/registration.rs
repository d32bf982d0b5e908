//! Registration entity
//!
//! Consumer-side record of whether and how we are registered with one
//! producer. It is a pure state machine: the producer's answers are fed in by
//! the caller, this type never talks to the network.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::property::{PropertyDescriptionData, PropertyError};
use super::service_description::ServiceDescription;
use crate::domain::value_objects::{QName, RegistrationStatus, DEFAULT_LANG};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("registration status is undetermined, a refresh against the producer is required first")]
    RefreshRequired,

    #[error("no registration is held with the producer")]
    NotRegistered,

    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// How a local property compares with the producer's expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    /// Not yet checked against the producer
    #[default]
    Unchecked,
    /// Known to the producer
    Valid,
    /// Required by the producer but has no usable value
    Missing,
    /// Not known to the producer
    Inexistent,
}

/// A property value the consumer supplies at registration time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProperty {
    name: QName,
    value: String,
    lang: String,
    #[serde(default)]
    status: PropertyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<PropertyDescriptionData>,
}

impl RegistrationProperty {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            lang: DEFAULT_LANG.to_string(),
            status: PropertyStatus::Unchecked,
            description: None,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn status(&self) -> PropertyStatus {
        self.status
    }

    /// The producer's description of this property, once refreshed
    pub fn description(&self) -> Option<&PropertyDescriptionData> {
        self.description.as_ref()
    }
}

/// Handle and opaque state handed back by a producer on registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationContext {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Vec<u8>>,
}

impl RegistrationContext {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: Vec<u8>) -> Self {
        self.state = Some(state);
        self
    }
}

/// Outcome of comparing local registration data with a service description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResult {
    pub status: RegistrationStatus,
    pub previous_status: RegistrationStatus,
    /// Required by the producer, absent locally
    pub missing: Vec<QName>,
    /// Present locally, unknown to the producer
    pub extra: Vec<QName>,
}

impl RefreshResult {
    pub fn status_changed(&self) -> bool {
        self.status != self.previous_status
    }

    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    status: RegistrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<RegistrationContext>,
    #[serde(default)]
    properties: BTreeMap<QName, RegistrationProperty>,
    #[serde(default)]
    modified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_refresh: Option<DateTime<Utc>>,
}

impl RegistrationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a record from persisted parts
    pub fn restore(
        status: RegistrationStatus,
        context: Option<RegistrationContext>,
        properties: Vec<RegistrationProperty>,
        modified: bool,
        last_refresh: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            status,
            context,
            properties: properties
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            modified,
            last_refresh,
        }
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Whether local edits have not yet been accepted by the producer
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Fails with [`RegistrationError::RefreshRequired`] until a refresh happened
    pub fn is_registration_required(&self) -> Result<bool, RegistrationError> {
        match self.status {
            RegistrationStatus::Undetermined => Err(RegistrationError::RefreshRequired),
            RegistrationStatus::NotRequired => Ok(false),
            _ => Ok(true),
        }
    }

    /// Fails with [`RegistrationError::RefreshRequired`] until a refresh happened
    pub fn is_registration_valid(&self) -> Result<bool, RegistrationError> {
        match self.status {
            RegistrationStatus::Undetermined => Err(RegistrationError::RefreshRequired),
            RegistrationStatus::NotRequired | RegistrationStatus::Registered => Ok(true),
            RegistrationStatus::RequiredNotRegistered | RegistrationStatus::LocallyModified => {
                Ok(false)
            }
        }
    }

    pub fn is_registration_determined_required(&self) -> bool {
        self.status.is_determined() && self.status != RegistrationStatus::NotRequired
    }

    pub fn is_registration_determined_not_required(&self) -> bool {
        self.status == RegistrationStatus::NotRequired
    }

    pub fn context(&self) -> Option<&RegistrationContext> {
        self.context.as_ref()
    }

    pub fn registration_handle(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.handle.as_str())
    }

    pub fn registration_state(&self) -> Option<&[u8]> {
        self.context.as_ref().and_then(|c| c.state.as_deref())
    }

    pub fn property(&self, name: &QName) -> Option<&RegistrationProperty> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &RegistrationProperty> {
        self.properties.values()
    }

    pub fn property_names(&self) -> Vec<QName> {
        self.properties.keys().cloned().collect()
    }

    /// Name to value view, the part the producer actually receives
    pub fn property_values(&self) -> BTreeMap<QName, String> {
        self.properties
            .iter()
            .map(|(name, p)| (name.clone(), p.value.clone()))
            .collect()
    }

    /// Set (or add) a property value.
    ///
    /// An empty value is rejected and leaves the record unchanged. A real
    /// change while registered moves the record to `LocallyModified`.
    pub fn set_property_value(
        &mut self,
        name: QName,
        value: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(PropertyError::MissingValue { name }.into());
        }

        match self.properties.get_mut(&name) {
            Some(existing) if existing.value == value => return Ok(()),
            Some(existing) => {
                existing.value = value;
                existing.status = PropertyStatus::Unchecked;
            }
            None => {
                self.properties
                    .insert(name.clone(), RegistrationProperty::new(name, value));
            }
        }
        self.mark_modified();
        Ok(())
    }

    pub fn remove_property(&mut self, name: &QName) -> Option<RegistrationProperty> {
        let removed = self.properties.remove(name);
        if removed.is_some() {
            self.mark_modified();
        }
        removed
    }

    fn mark_modified(&mut self) {
        self.modified = true;
        if self.status == RegistrationStatus::Registered {
            self.status = RegistrationStatus::LocallyModified;
        }
    }

    /// Compare local data with what the producer currently expects.
    ///
    /// Repeating a refresh against the same description without local edits
    /// in between always lands on the same status.
    pub fn refresh(&mut self, description: &ServiceDescription) -> RefreshResult {
        let previous_status = self.status;
        let mut missing = Vec::new();
        let mut extra = Vec::new();

        if description.requires_registration {
            for (name, property) in self.properties.iter_mut() {
                match description.property(name) {
                    Some(expected) => {
                        property.description = Some(expected.clone());
                        property.status = PropertyStatus::Valid;
                    }
                    None => {
                        property.description = None;
                        property.status = PropertyStatus::Inexistent;
                        extra.push(name.clone());
                    }
                }
            }
            for expected in &description.registration_properties {
                if !self.properties.contains_key(&expected.name) {
                    missing.push(expected.name.clone());
                }
            }

            let consistent = missing.is_empty() && extra.is_empty();
            self.status = match (&self.context, consistent) {
                (Some(_), true) if self.modified => RegistrationStatus::LocallyModified,
                (Some(_), true) => RegistrationStatus::Registered,
                _ => RegistrationStatus::RequiredNotRegistered,
            };
        } else {
            for (name, property) in self.properties.iter_mut() {
                property.description = None;
                property.status = PropertyStatus::Inexistent;
                extra.push(name.clone());
            }
            self.status = RegistrationStatus::NotRequired;
        }

        self.last_refresh = Some(Utc::now());
        if previous_status != self.status {
            tracing::debug!(from = %previous_status, to = %self.status, "registration status refreshed");
        }

        RefreshResult {
            status: self.status,
            previous_status,
            missing,
            extra,
        }
    }

    /// Record a successful register or modify-registration call
    pub fn registration_succeeded(&mut self, context: RegistrationContext) {
        self.context = Some(context);
        self.modified = false;
        for property in self.properties.values_mut() {
            property.status = PropertyStatus::Valid;
        }
        self.status = RegistrationStatus::Registered;
    }

    /// Record a deregistration, or the producer forgetting about us
    pub fn deregistered(&mut self) -> Option<RegistrationContext> {
        let context = self.context.take();
        if self.status.holds_registration() {
            self.status = RegistrationStatus::RequiredNotRegistered;
        }
        context
    }

    /// Compare property names and values, ignoring descriptive metadata
    pub fn has_equal_properties(&self, other: &RegistrationInfo) -> bool {
        self.has_equal_values(&other.property_values())
    }

    pub fn has_equal_values(&self, values: &BTreeMap<QName, String>) -> bool {
        self.properties.len() == values.len()
            && self
                .properties
                .iter()
                .all(|(name, p)| values.get(name) == Some(&p.value))
    }
}
