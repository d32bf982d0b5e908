//! Registration requirements
//!
//! The collection of property descriptions a producer demands at registration
//! time. It listens to every description it owns so its name index always
//! matches the descriptions' current names.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::property::{
    PropertyChange, PropertyChangeListener, PropertyDescriptionData, PropertyError,
    RegistrationPropertyDescription,
};
use super::service_description::ServiceDescription;
use crate::domain::value_objects::QName;

struct State {
    registration_required: bool,
    properties: HashMap<QName, RegistrationPropertyDescription>,
    last_modified: DateTime<Utc>,
}

pub struct RegistrationRequirements {
    state: RwLock<State>,
}

impl RegistrationRequirements {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(State {
                registration_required: false,
                properties: HashMap::new(),
                last_modified: Utc::now(),
            }),
        })
    }

    fn as_listener(self: &Arc<Self>) -> Weak<dyn PropertyChangeListener> {
        let weak: Weak<dyn PropertyChangeListener> = Arc::downgrade(self) as _;
        weak
    }

    /// Declare a new property, built already bound to this collection
    pub fn add_empty_property(
        self: &Arc<Self>,
        name: QName,
        type_name: QName,
    ) -> Result<RegistrationPropertyDescription, PropertyError> {
        let data = PropertyDescriptionData {
            type_name,
            ..PropertyDescriptionData::new(name)
        };
        let property = RegistrationPropertyDescription::with_listener(data, self.as_listener());
        self.insert(property)
    }

    /// Take ownership of an existing description.
    ///
    /// A description still held by another live collection is refused with
    /// [`PropertyError::AlreadyOwned`].
    pub fn add_property(
        self: &Arc<Self>,
        property: RegistrationPropertyDescription,
    ) -> Result<RegistrationPropertyDescription, PropertyError> {
        {
            let state = self.state.read();
            let name = property.name();
            if state.properties.contains_key(&name) {
                return Err(PropertyError::DuplicateName { name });
            }
        }
        property.attach(self.as_listener())?;
        self.insert(property.clone()).map_err(|e| {
            property.detach();
            e
        })
    }

    fn insert(
        &self,
        property: RegistrationPropertyDescription,
    ) -> Result<RegistrationPropertyDescription, PropertyError> {
        let name = property.name();
        let mut state = self.state.write();
        if state.properties.contains_key(&name) {
            return Err(PropertyError::DuplicateName { name });
        }
        state.properties.insert(name.clone(), property.clone());
        state.last_modified = Utc::now();
        tracing::debug!(property = %name, "registration property added");
        Ok(property)
    }

    pub fn property(&self, name: &QName) -> Option<RegistrationPropertyDescription> {
        self.state.read().properties.get(name).cloned()
    }

    pub fn contains(&self, name: &QName) -> bool {
        self.state.read().properties.contains_key(name)
    }

    pub fn remove_property(&self, name: &QName) -> Option<RegistrationPropertyDescription> {
        let removed = {
            let mut state = self.state.write();
            let removed = state.properties.remove(name);
            if removed.is_some() {
                state.last_modified = Utc::now();
            }
            removed
        };
        if let Some(property) = &removed {
            property.detach();
            tracing::debug!(property = %name, "registration property removed");
        }
        removed
    }

    pub fn clear_properties(&self) {
        let removed: Vec<_> = {
            let mut state = self.state.write();
            state.last_modified = Utc::now();
            state.properties.drain().map(|(_, p)| p).collect()
        };
        for property in removed {
            property.detach();
        }
    }

    /// Property names, sorted
    pub fn property_names(&self) -> Vec<QName> {
        let mut names: Vec<_> = self.state.read().properties.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.state.read().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().properties.is_empty()
    }

    pub fn is_registration_required(&self) -> bool {
        self.state.read().registration_required
    }

    pub fn set_registration_required(&self, required: bool) {
        let mut state = self.state.write();
        if state.registration_required != required {
            state.registration_required = required;
            state.last_modified = Utc::now();
        }
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.state.read().last_modified
    }

    /// Snapshot offered to consumers in answer to a capability query
    pub fn service_description(&self) -> ServiceDescription {
        let state = self.state.read();
        let mut properties: Vec<_> = state.properties.values().map(|p| p.snapshot()).collect();
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        ServiceDescription {
            requires_registration: state.registration_required,
            registration_properties: properties,
        }
    }
}

impl PropertyChangeListener for RegistrationRequirements {
    fn on_value_changed(&self, property: &RegistrationPropertyDescription, change: &PropertyChange) {
        self.state.write().last_modified = Utc::now();
        tracing::debug!(
            property = %property.name(),
            field = change.field(),
            "registration property changed"
        );
    }

    fn on_name_changed(
        &self,
        property: &RegistrationPropertyDescription,
        old_name: &QName,
        new_name: &QName,
    ) -> Result<(), PropertyError> {
        let mut state = self.state.write();

        match state.properties.get(old_name) {
            Some(held) if held.same_as(property) => {}
            _ => {
                return Err(PropertyError::NotOwned {
                    name: old_name.clone(),
                })
            }
        }
        if state.properties.contains_key(new_name) {
            return Err(PropertyError::DuplicateName {
                name: new_name.clone(),
            });
        }

        if let Some(held) = state.properties.remove(old_name) {
            state.properties.insert(new_name.clone(), held);
        }
        state.last_modified = Utc::now();
        tracing::debug!(from = %old_name, to = %new_name, "registration property renamed");
        Ok(())
    }
}
