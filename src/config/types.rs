//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::loader;
use crate::application::ConsumerIdentity;
use crate::infrastructure::default_store_path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Consumer store location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured path, or `~/.wsrp/consumers.toml`
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

/// Defaults for producer connections and how we present ourselves to producers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumersConfig {
    /// Seconds, used when `create` is not given one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cache_expiration: Option<u32>,

    #[serde(default = "default_consumer_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl Default for ConsumersConfig {
    fn default() -> Self {
        Self {
            default_cache_expiration: None,
            name: default_consumer_name(),
            agent: None,
        }
    }
}

impl ConsumersConfig {
    pub fn identity(&self) -> ConsumerIdentity {
        let defaults = ConsumerIdentity::default();
        ConsumerIdentity {
            name: self.name.clone(),
            agent: self.agent.clone().unwrap_or(defaults.agent),
        }
    }
}

fn default_consumer_name() -> String {
    ConsumerIdentity::default().name
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `wsrp=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub consumers: ConsumersConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load a config file, discarding warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }
}
