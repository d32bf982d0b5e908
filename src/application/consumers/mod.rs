//! Consumer Registry Module
//!
//! The authoritative set of configured producer connections.
//!
//! ## Structure
//!
//! - `error` - Error type (`RegistryError`)
//! - `registry` - The registry itself (`ConsumerRegistry`)
//!
//! ## Usage
//!
//! ```ignore
//! use wsrp::application::consumers::ConsumerRegistry;
//!
//! let registry = ConsumerRegistry::new(store);
//! registry.start()?;
//! let producer = registry.create_consumer("foo", None, Some(wsdl))?;
//! ```

mod error;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::ConsumerRegistry;
