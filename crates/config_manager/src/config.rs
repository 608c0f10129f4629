//! The integration configuration object.
//!
//! [`Config`] is the single source of truth shared with the host. Updates are expressed
//! as consuming `with_*` methods that return the next value, so a transition either
//! produces a complete new configuration or nothing.

use azure_devops_client::{ApiKeyAuth, Auth, OAuth2Auth};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Account, ConfigurationError, ConfigurationResult, IntegrationType};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Configuration persisted by the host.
///
/// # Invariants
///
/// - At most one of `apikey_auth` / `oauth2_auth` is set; [`Config::with_auth`]
///   clears the other.
/// - `accounts` is keyed by project id and every value's `id` equals its key.
/// - A credential is only meaningful once `integration_type` is set.
///
/// # Example TOML
///
/// ```toml
/// integration_type = "SELFMANAGED"
///
/// [apikey_auth]
/// apikey = "..."
/// url = "https://tfs.example.com/DefaultCollection"
///
/// [accounts.0f1c8d3a]
/// id = "0f1c8d3a"
/// name = "Platform"
/// description = ""
/// totalCount = 4
/// type = "ORG"
/// public = false
/// selected = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<IntegrationType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey_auth: Option<ApiKeyAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth2_auth: Option<OAuth2Auth>,

    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,
}

impl Config {
    /// The active credential, if authentication has begun.
    pub fn auth(&self) -> Option<Auth> {
        match (&self.oauth2_auth, &self.apikey_auth) {
            (Some(oauth), _) => Some(Auth::OAuth2(oauth.clone())),
            (None, Some(key)) => Some(Auth::ApiKey(key.clone())),
            (None, None) => None,
        }
    }

    pub fn has_auth(&self) -> bool {
        self.apikey_auth.is_some() || self.oauth2_auth.is_some()
    }

    pub fn with_integration_type(mut self, integration_type: IntegrationType) -> Self {
        self.integration_type = Some(integration_type);
        self
    }

    /// Replaces the credential wholesale, clearing the other kind.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        match auth {
            Auth::ApiKey(key) => {
                self.apikey_auth = Some(key);
                self.oauth2_auth = None;
            }
            Auth::OAuth2(oauth) => {
                self.oauth2_auth = Some(oauth);
                self.apikey_auth = None;
            }
        }
        self
    }

    /// Restores a previous credential, or clears both when there was none.
    pub fn with_optional_auth(self, auth: Option<Auth>) -> Self {
        match auth {
            Some(auth) => self.with_auth(auth),
            None => self.without_auth(),
        }
    }

    pub fn without_auth(mut self) -> Self {
        self.apikey_auth = None;
        self.oauth2_auth = None;
        self
    }

    pub fn with_accounts(mut self, accounts: BTreeMap<String, Account>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Accounts in id order.
    pub fn accounts_list(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.accounts.values().filter(|a| a.selected).count()
    }

    /// Checks the schema invariants of a configuration read from storage.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidConfiguration` naming the offending field.
    pub fn validate(&self) -> ConfigurationResult<()> {
        if self.apikey_auth.is_some() && self.oauth2_auth.is_some() {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "oauth2_auth".to_string(),
                reason: "apikey_auth and oauth2_auth are mutually exclusive".to_string(),
            });
        }

        if self.has_auth() && self.integration_type.is_none() {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "integration_type".to_string(),
                reason: "a credential is set but the integration type is not".to_string(),
            });
        }

        if let Some((key, account)) = self.accounts.iter().find(|(key, a)| **key != a.id) {
            return Err(ConfigurationError::InvalidConfiguration {
                field: format!("accounts.{}", key),
                reason: format!("account id '{}' does not match its key", account.id),
            });
        }

        Ok(())
    }
}
