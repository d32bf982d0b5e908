//! Localized string value object

use serde::{Deserialize, Serialize};

/// Default language tag used when none is given
pub const DEFAULT_LANG: &str = "en";

/// A human readable string tagged with its language
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedString {
    pub value: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl LocalizedString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: default_lang(),
            resource_name: None,
        }
    }

    pub fn with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: lang.into(),
            resource_name: None,
        }
    }

    pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }
}

impl std::fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
