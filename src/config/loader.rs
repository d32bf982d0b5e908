//! Configuration loading

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::types::{Config, ConfigError};
use crate::domain::value_objects::ConfigWarning;

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                line: find_line_number(&content, &leaf),
                suggestion: suggest_key(&leaf),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from an explicit path, the user config, or defaults, then apply
/// `WSRP_*` environment overrides.
///
/// An explicit path must exist; a missing user config just means defaults.
pub fn load(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let (config, warnings) = match explicit {
        Some(path) => load_with_warnings(path)?,
        None => match user_config_path().filter(|p| p.exists()) {
            Some(path) => load_with_warnings(&path)?,
            None => (Config::default(), Vec::new()),
        },
    };
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (WSRP_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable source.
///
/// Invalid values are reported on stderr and ignored. Logging is not set up
/// yet when the config loads, so this does not go through `tracing`.
pub fn apply_env_overrides(config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    apply_env_overrides_with_writer(config, var, &mut std::io::stderr())
}

/// Apply overrides, writing warnings about invalid values to `writer`
pub fn apply_env_overrides_with_writer<W: Write>(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
    writer: &mut W,
) -> Config {
    if let Some(path) = var("WSRP_STORE_PATH").filter(|p| !p.is_empty()) {
        config.store.path = Some(PathBuf::from(path));
    }

    if let Some(level) = var("WSRP_LOG_LEVEL").filter(|l| !l.is_empty()) {
        config.logging.level = level;
    }

    if let Some(raw) = var("WSRP_CACHE_EXPIRATION") {
        match raw.trim().parse::<u32>() {
            Ok(seconds) => config.consumers.default_cache_expiration = Some(seconds),
            Err(_) => {
                let _ = writeln!(
                    writer,
                    "warning: ignoring WSRP_CACHE_EXPIRATION='{raw}', expected a number of seconds"
                );
            }
        }
    }

    config
}

/// `$XDG_CONFIG_HOME/wsrp/config.toml`, else `~/.config/wsrp/config.toml`
fn user_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|dir| dir.join("wsrp/config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "store",
        "path",
        "consumers",
        "default_cache_expiration",
        "name",
        "agent",
        "logging",
        "level",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
