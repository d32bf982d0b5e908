//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod consumer_store;
pub mod invocation;
pub mod producer_endpoint;

pub use consumer_store::{ConsumerStore, StoreError, StoreResult};
pub use invocation::PortletInvocation;
pub use producer_endpoint::{EndpointError, ProducerEndpoint, RegistrationData};
