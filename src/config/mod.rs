//! Configuration module for wsrp
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (WSRP_*)
//! 3. Explicit `--config` file, else user config (~/.config/wsrp/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    apply_env_overrides, apply_env_overrides_with_writer, load, load_with_warnings,
    with_env_overrides,
};
pub use types::{Config, ConfigError, ConsumersConfig, LoggingConfig, StoreConfig};
