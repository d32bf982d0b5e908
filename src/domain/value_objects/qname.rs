//! Qualified name value object
//!
//! Registration properties are addressed by a namespace plus a local part,
//! rendered in Clark notation: `{namespace}local`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QName {
    namespace: String,
    local_part: String,
}

/// Error raised when a qualified name cannot be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QNameError {
    #[error("qualified name must have a non-empty local part")]
    EmptyLocalPart,

    #[error("malformed qualified name '{0}': missing closing '}}'")]
    Unclosed(String),
}

impl QName {
    /// Create a name in the given namespace
    pub fn new(
        namespace: impl Into<String>,
        local_part: impl Into<String>,
    ) -> Result<Self, QNameError> {
        let local_part = local_part.into();
        if local_part.trim().is_empty() {
            return Err(QNameError::EmptyLocalPart);
        }
        Ok(Self {
            namespace: namespace.into(),
            local_part,
        })
    }

    /// Build a name from parts known to be valid
    pub(crate) fn new_unchecked(namespace: &str, local_part: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            local_part: local_part.to_string(),
        }
    }

    /// Create a name without a namespace
    pub fn local(local_part: impl Into<String>) -> Result<Self, QNameError> {
        Self::new(String::new(), local_part)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_part)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_part)
        }
    }
}

impl FromStr for QName {
    type Err = QNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local) = rest
                    .split_once('}')
                    .ok_or_else(|| QNameError::Unclosed(s.to_string()))?;
                Self::new(namespace, local)
            }
            None => Self::local(s),
        }
    }
}

impl TryFrom<String> for QName {
    type Error = QNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QName> for String {
    fn from(name: QName) -> Self {
        name.to_string()
    }
}
