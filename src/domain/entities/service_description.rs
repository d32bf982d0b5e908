//! Service description entity
//!
//! What a producer reports about itself in answer to a capability query. Only
//! the registration-related part is modelled here.

use serde::{Deserialize, Serialize};

use super::property::PropertyDescriptionData;
use crate::domain::value_objects::QName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub requires_registration: bool,
    #[serde(default)]
    pub registration_properties: Vec<PropertyDescriptionData>,
}

impl ServiceDescription {
    /// A producer that accepts unregistered consumers
    pub fn open() -> Self {
        Self::default()
    }

    /// A producer requiring registration with the given properties
    pub fn requiring(properties: Vec<PropertyDescriptionData>) -> Self {
        Self {
            requires_registration: true,
            registration_properties: properties,
        }
    }

    pub fn property(&self, name: &QName) -> Option<&PropertyDescriptionData> {
        self.registration_properties.iter().find(|p| &p.name == name)
    }
}
