//! Configuration management for the Azure DevOps integration
//!
//! This crate owns the configuration object shared between the integration and its
//! host: where the organization lives (cloud or self-managed), which credential is in
//! use, and which accounts (projects) the user enabled for ingestion.
//!
//! The host persists the configuration; this crate defines the schema and the
//! [`ConfigStore`] seam the host implements, plus file-backed and in-memory stores.

pub mod config;
pub mod config_store;
pub mod errors;
pub mod types;

// Re-export for convenient access
pub use config::Config;
pub use config_store::{ConfigStore, FileConfigStore, MemoryConfigStore};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use types::{Account, AccountType, IntegrationType};
