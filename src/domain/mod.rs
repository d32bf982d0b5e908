//! Domain Layer
//!
//! Registration, session and migration logic without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Producer connections, registration state, sessions, exports
//! - `value_objects/` - Immutable value types (QName, RegistrationStatus)
//! - `services/` - Pure services (export codec)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
