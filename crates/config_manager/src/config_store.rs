//! Configuration store trait definition and implementations
//!
//! The host owns persistence. The integration only needs to load the configuration
//! when a session starts and hand back every changed value.

use async_trait::async_trait;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        RwLock,
    },
};
use tracing::{debug, info, warn};

use crate::{Config, ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "config_store_tests.rs"]
mod tests;

/// Load/save capability provided by the host.
///
/// # Examples
///
/// ```no_run
/// use config_manager::{Config, ConfigStore, ConfigurationResult};
/// use async_trait::async_trait;
///
/// struct HostBridge;
///
/// #[async_trait]
/// impl ConfigStore for HostBridge {
///     async fn load(&self) -> ConfigurationResult<Config> {
///         Ok(Config::default())
///     }
///
///     async fn save(&self, _config: &Config) -> ConfigurationResult<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the persisted configuration
    ///
    /// # Returns
    /// The stored configuration, or an empty one if nothing was stored yet
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the stored value cannot be read or is invalid
    async fn load(&self) -> ConfigurationResult<Config>;

    /// Persist a configuration, replacing the stored one
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the value cannot be written
    async fn save(&self, config: &Config) -> ConfigurationResult<()>;
}

/// Stores the configuration as a TOML file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn access_error(&self, reason: impl ToString) -> ConfigurationError {
        ConfigurationError::FileAccessError {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> ConfigurationResult<Config> {
        debug!("Loading configuration from {:?}", self.path);

        if !self.path.exists() {
            info!(path = ?self.path, "No configuration file yet, starting empty");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.access_error(e))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            warn!(path = ?self.path, error = %e, "Configuration file is not valid TOML");
            ConfigurationError::ParseError {
                reason: format!("{}: {}", self.path.display(), e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    async fn save(&self, config: &Config) -> ConfigurationResult<()> {
        debug!("Saving configuration to {:?}", self.path);

        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigurationError::SerializationError {
                reason: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.access_error(e))?;
            }
        }

        fs::write(&self.path, content).map_err(|e| self.access_error(e))?;

        info!(
            path = ?self.path,
            account_count = config.accounts.len(),
            "Configuration saved"
        );
        Ok(())
    }
}

/// Keeps the configuration in memory.
///
/// Used by embedding hosts that persist elsewhere, and by tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RwLock<Config>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            ..Self::default()
        }
    }

    /// The most recently saved configuration.
    pub fn snapshot(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Makes subsequent saves fail, simulating an unavailable host.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> ConfigurationResult<Config> {
        Ok(self.snapshot())
    }

    async fn save(&self, config: &Config) -> ConfigurationResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigurationError::FileAccessError {
                path: "<memory>".to_string(),
                reason: "store is unavailable".to_string(),
            });
        }

        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
