//! Registration property description
//!
//! A producer declares the properties a consumer must supply at registration
//! time. Each description belongs to at most one owning collection, which is
//! told about every change through a [`PropertyChangeListener`] handed to the
//! description when it is built or attached.
//!
//! Descriptions are shared handles: clones observe the same underlying data,
//! so a handle obtained from the owner can be edited in place and the owner
//! stays consistent.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{LocalizedString, QName};

/// XML Schema string type, the default declared type of a property
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Errors raised while mutating registration properties
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("a property named '{name}' already exists")]
    DuplicateName { name: QName },

    #[error("property '{name}' is not held by this collection")]
    NotOwned { name: QName },

    #[error("invalid property name: {0}")]
    InvalidName(#[from] crate::domain::value_objects::QNameError),

    #[error("property '{name}' has no value")]
    MissingValue { name: QName },

    #[error("property '{name}' already belongs to another collection")]
    AlreadyOwned { name: QName },
}

/// A non-name change on a property description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    Type {
        old: QName,
        new: QName,
    },
    Label {
        old: Option<LocalizedString>,
        new: Option<LocalizedString>,
    },
    Hint {
        old: Option<LocalizedString>,
        new: Option<LocalizedString>,
    },
    Description {
        old: Option<LocalizedString>,
        new: Option<LocalizedString>,
    },
}

impl PropertyChange {
    /// Name of the changed attribute
    pub fn field(&self) -> &'static str {
        match self {
            PropertyChange::Type { .. } => "type",
            PropertyChange::Label { .. } => "label",
            PropertyChange::Hint { .. } => "hint",
            PropertyChange::Description { .. } => "description",
        }
    }

    /// Value changes never rename the property
    pub fn is_name_change(&self) -> bool {
        false
    }
}

/// Owner-side callbacks for property changes.
///
/// `on_name_changed` runs before the description records its new name, so the
/// owner can still find the property under `old_name`. Returning an error
/// vetoes the rename and leaves the description untouched.
pub trait PropertyChangeListener: Send + Sync {
    fn on_value_changed(&self, property: &RegistrationPropertyDescription, change: &PropertyChange);

    fn on_name_changed(
        &self,
        property: &RegistrationPropertyDescription,
        old_name: &QName,
        new_name: &QName,
    ) -> Result<(), PropertyError>;
}

/// Plain data of a property description, detached from any owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptionData {
    pub name: QName,
    #[serde(rename = "type")]
    pub type_name: QName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
}

impl PropertyDescriptionData {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            type_name: xsd_string(),
            label: None,
            hint: None,
            description: None,
        }
    }
}

/// The `{http://www.w3.org/2001/XMLSchema}string` type name
pub fn xsd_string() -> QName {
    QName::new_unchecked(XSD_NAMESPACE, "string")
}

struct Inner {
    data: PropertyDescriptionData,
    listener: Option<Weak<dyn PropertyChangeListener>>,
}

/// Shared handle on a registration property description
#[derive(Clone)]
pub struct RegistrationPropertyDescription {
    inner: Arc<RwLock<Inner>>,
}

impl RegistrationPropertyDescription {
    /// Create an unowned description of type `xsd:string`
    pub fn new(name: QName) -> Self {
        Self::from_data(PropertyDescriptionData::new(name), None)
    }

    /// Create a description already bound to its owner
    pub fn with_listener(
        data: PropertyDescriptionData,
        listener: Weak<dyn PropertyChangeListener>,
    ) -> Self {
        Self::from_data(data, Some(listener))
    }

    pub fn from_data(
        data: PropertyDescriptionData,
        listener: Option<Weak<dyn PropertyChangeListener>>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { data, listener })),
        }
    }

    pub fn name(&self) -> QName {
        self.inner.read().data.name.clone()
    }

    pub fn type_name(&self) -> QName {
        self.inner.read().data.type_name.clone()
    }

    pub fn label(&self) -> Option<LocalizedString> {
        self.inner.read().data.label.clone()
    }

    pub fn hint(&self) -> Option<LocalizedString> {
        self.inner.read().data.hint.clone()
    }

    pub fn description(&self) -> Option<LocalizedString> {
        self.inner.read().data.description.clone()
    }

    /// Copy of the current data, without the owner binding
    pub fn snapshot(&self) -> PropertyDescriptionData {
        self.inner.read().data.clone()
    }

    /// Whether both handles point at the same description
    pub fn same_as(&self, other: &RegistrationPropertyDescription) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Bind this description to an owner.
    ///
    /// Fails with [`PropertyError::AlreadyOwned`] while a previous owner is
    /// still alive; the previous owner has to release it first.
    pub fn attach(&self, listener: Weak<dyn PropertyChangeListener>) -> Result<(), PropertyError> {
        let mut inner = self.inner.write();
        if inner
            .listener
            .as_ref()
            .is_some_and(|current| current.strong_count() > 0)
        {
            return Err(PropertyError::AlreadyOwned {
                name: inner.data.name.clone(),
            });
        }
        inner.listener = Some(listener);
        Ok(())
    }

    pub fn detach(&self) {
        self.inner.write().listener = None;
    }

    pub fn is_attached(&self) -> bool {
        self.listener().is_some()
    }

    fn listener(&self) -> Option<Arc<dyn PropertyChangeListener>> {
        self.inner
            .read()
            .listener
            .as_ref()
            .and_then(|weak| weak.upgrade())
    }

    /// Rename the property.
    ///
    /// The owner is consulted first and may refuse the new name. The
    /// description keeps answering to its old name until the owner has
    /// re-indexed it.
    pub fn set_name(&self, new_name: QName) -> Result<(), PropertyError> {
        let old_name = self.name();
        if old_name == new_name {
            return Ok(());
        }

        if let Some(listener) = self.listener() {
            listener.on_name_changed(self, &old_name, &new_name)?;
        }

        self.inner.write().data.name = new_name;
        Ok(())
    }

    pub fn set_type(&self, type_name: QName) {
        let old = {
            let mut inner = self.inner.write();
            if inner.data.type_name == type_name {
                return;
            }
            std::mem::replace(&mut inner.data.type_name, type_name.clone())
        };
        self.notify(PropertyChange::Type {
            old,
            new: type_name,
        });
    }

    pub fn set_label(&self, label: Option<LocalizedString>) {
        if let Some(old) = self.replace_text(|data| &mut data.label, label.clone()) {
            self.notify(PropertyChange::Label { old, new: label });
        }
    }

    /// Set the label in the default language
    pub fn set_default_label(&self, label: impl Into<String>) {
        self.set_label(Some(LocalizedString::new(label)));
    }

    pub fn set_hint(&self, hint: Option<LocalizedString>) {
        if let Some(old) = self.replace_text(|data| &mut data.hint, hint.clone()) {
            self.notify(PropertyChange::Hint { old, new: hint });
        }
    }

    /// Set the hint in the default language
    pub fn set_default_hint(&self, hint: impl Into<String>) {
        self.set_hint(Some(LocalizedString::new(hint)));
    }

    pub fn set_description(&self, description: Option<LocalizedString>) {
        if let Some(old) = self.replace_text(|data| &mut data.description, description.clone()) {
            self.notify(PropertyChange::Description {
                old,
                new: description,
            });
        }
    }

    /// Swap a text attribute, returning the old value only if it changed
    fn replace_text<F>(
        &self,
        field: F,
        value: Option<LocalizedString>,
    ) -> Option<Option<LocalizedString>>
    where
        F: FnOnce(&mut PropertyDescriptionData) -> &mut Option<LocalizedString>,
    {
        let mut inner = self.inner.write();
        let slot = field(&mut inner.data);
        if *slot == value {
            return None;
        }
        Some(std::mem::replace(slot, value))
    }

    // Called with no lock held so the owner may read this handle back.
    fn notify(&self, change: PropertyChange) {
        if let Some(listener) = self.listener() {
            listener.on_value_changed(self, &change);
        }
    }
}

impl PartialEq for RegistrationPropertyDescription {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) || self.snapshot() == other.snapshot()
    }
}

impl fmt::Debug for RegistrationPropertyDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("RegistrationPropertyDescription")
            .field("data", &inner.data)
            .field("attached", &inner.listener.is_some())
            .finish()
    }
}

impl From<PropertyDescriptionData> for RegistrationPropertyDescription {
    fn from(data: PropertyDescriptionData) -> Self {
        Self::from_data(data, None)
    }
}
