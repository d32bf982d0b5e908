//! Application Layer
//!
//! Use cases that orchestrate domain entities through the ports.
//!
//! ## Structure
//!
//! - `consumers` - Authoritative registry of configured producers
//! - `registration` - Refresh/register/modify/deregister against a producer
//! - `sessions` - Consumer session to producer session correlation
//! - `migration` - Ledger of export bundles available for import

pub mod consumers;
pub mod migration;
pub mod registration;
pub mod sessions;

pub use consumers::{ConsumerRegistry, RegistryError, RegistryResult};
pub use migration::MigrationService;
pub use registration::{ConsumerIdentity, RegistrationFlowError, RegistrationManager};
pub use sessions::{SessionHandler, SessionRegistry};
