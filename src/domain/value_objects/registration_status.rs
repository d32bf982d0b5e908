//! Registration status value object
//!
//! Where a consumer stands with respect to a producer's registration
//! requirements. Only a capability refresh or an explicit register/deregister
//! action moves a connection between states.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// No refresh has happened yet
    #[default]
    Undetermined,
    /// Producer does not require registration
    NotRequired,
    /// Producer requires registration and we hold no valid registration
    RequiredNotRegistered,
    /// Registered and consistent with the producer's expectations
    Registered,
    /// Registered, but local property edits have not been pushed to the producer
    LocallyModified,
}

impl RegistrationStatus {
    pub fn is_determined(&self) -> bool {
        !matches!(self, RegistrationStatus::Undetermined)
    }

    /// Whether a registration handle is expected to be held in this state
    pub fn holds_registration(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::Registered | RegistrationStatus::LocallyModified
        )
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RegistrationStatus::Undetermined => "undetermined",
            RegistrationStatus::NotRequired => "not required",
            RegistrationStatus::RequiredNotRegistered => "required, not registered",
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::LocallyModified => "locally modified",
        };
        write!(f, "{}", label)
    }
}
