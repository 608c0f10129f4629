//! Discovery strategies.
//!
//! Account discovery is pluggable. [`RestDiscovery`] calls the Azure DevOps REST API
//! directly; [`HostValidationDiscovery`] delegates to a host that validates the
//! configuration itself and returns the accounts it found.

use async_trait::async_trait;
use azure_devops_client::{Auth, AzureDevOpsClient, DiscoveryClient};
use config_manager::{Account, Config};
use tracing::{info, instrument, warn};

use crate::aggregator::{aggregate_accounts, DiscoveryOptions, DiscoveryReport};
use crate::{IntegrationError, IntegrationResult};

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;

/// Validates a credential and enumerates the accounts it can see.
///
/// An error means the credential could not be validated. Projects skipped after
/// validation succeeded are reported through [`DiscoveryReport::failures`] instead.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Discovers the accounts visible to `auth`.
    ///
    /// `config` is the configuration the credential will be stored in; strategies
    /// that delegate to the host send it along.
    async fn discover(&self, auth: &Auth, config: &Config) -> IntegrationResult<DiscoveryReport>;
}

/// Discovery through the REST API: list projects, then count repositories per project.
#[derive(Debug, Clone)]
pub struct RestDiscovery<C = AzureDevOpsClient> {
    client: C,
    options: DiscoveryOptions,
}

impl RestDiscovery<AzureDevOpsClient> {
    pub fn new() -> Self {
        Self::with_client(AzureDevOpsClient::new())
    }
}

impl Default for RestDiscovery<AzureDevOpsClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DiscoveryClient> RestDiscovery<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            options: DiscoveryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DiscoveryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DiscoveryOptions {
        self.options
    }
}

#[async_trait]
impl<C: DiscoveryClient> DiscoveryStrategy for RestDiscovery<C> {
    #[instrument(skip(self, auth, _config), fields(base_url = %auth.base_url()))]
    async fn discover(&self, auth: &Auth, _config: &Config) -> IntegrationResult<DiscoveryReport> {
        let projects = self.client.list_projects(auth).await.map_err(|e| {
            warn!(error = %e, "Credential validation failed");
            IntegrationError::from(e).into_validation_failure()
        })?;

        info!(project_count = projects.len(), "Credential validated");
        Ok(aggregate_accounts(&self.client, auth, projects, self.options).await)
    }
}

/// Host-side validation of a configuration.
///
/// The host receives the configuration with the candidate credential applied and
/// answers with the accounts it can see.
#[async_trait]
pub trait HostValidator: Send + Sync {
    async fn validate(&self, config: &Config) -> IntegrationResult<Vec<Account>>;
}

/// Discovery delegated to a [`HostValidator`].
#[derive(Debug, Clone)]
pub struct HostValidationDiscovery<V> {
    validator: V,
}

impl<V: HostValidator> HostValidationDiscovery<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl<V: HostValidator> DiscoveryStrategy for HostValidationDiscovery<V> {
    #[instrument(skip(self, auth, config))]
    async fn discover(&self, auth: &Auth, config: &Config) -> IntegrationResult<DiscoveryReport> {
        let candidate = config.clone().with_auth(auth.clone());

        let accounts = self.validator.validate(&candidate).await.map_err(|e| {
            warn!(error = %e, "Host rejected the configuration");
            e.into_validation_failure()
        })?;

        info!(account_count = accounts.len(), "Host validated the configuration");
        Ok(DiscoveryReport::from_accounts(
            accounts
                .into_iter()
                .map(|account| account.with_selected(false))
                .collect(),
        ))
    }
}
