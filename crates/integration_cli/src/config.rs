//! Configuration file location for the azdo-connect CLI.
//!
//! The integration configuration is stored as TOML. Its location comes from the
//! `--config` flag, then the `AZDO_CONNECT_CONFIG` environment variable, then
//! `azdo-connect.toml` in the current directory.

use std::path::PathBuf;
use tracing::debug;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "azdo-connect.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "AZDO_CONNECT_CONFIG";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Determines the configuration file path for this invocation.
///
/// # Arguments
///
/// * `config_path` - Path given on the command line, if any
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    let path = resolve_config_path(config_path, std::env::var(CONFIG_ENV_VAR).ok());
    debug!(path = ?path, "Resolved configuration path");
    path
}

/// Picks the first non-empty candidate, falling back to the current directory.
pub fn resolve_config_path(config_path: Option<&str>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = config_path.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    if let Some(path) = env_value.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(path);
    }

    // Look for config in current directory
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    current_dir.join(DEFAULT_CONFIG_FILENAME)
}
