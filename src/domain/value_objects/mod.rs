//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod localized_string;
mod qname;
mod registration_status;

pub use config_warning::ConfigWarning;
pub use localized_string::{LocalizedString, DEFAULT_LANG};
pub use qname::{QName, QNameError};
pub use registration_status::RegistrationStatus;
