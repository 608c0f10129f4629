//! Basic configuration types and enums.
//!
//! This module provides the value types stored in the integration configuration.

use azure_devops_client::Project;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::ConfigurationError;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

/// Where the Azure DevOps organization is hosted.
///
/// # Examples
///
/// ```rust
/// use config_manager::IntegrationType;
///
/// let location: IntegrationType = "self-managed".parse().unwrap();
/// assert_eq!(location, IntegrationType::SelfManaged);
/// assert_eq!(location.to_string(), "SELFMANAGED");
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntegrationType {
    /// dev.azure.com, authenticated through the OAuth2 redirect flow
    Cloud,
    /// Azure DevOps Server / TFS, authenticated with an API key
    SelfManaged,
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationType::Cloud => write!(f, "CLOUD"),
            IntegrationType::SelfManaged => write!(f, "SELFMANAGED"),
        }
    }
}

impl FromStr for IntegrationType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "cloud" => Ok(IntegrationType::Cloud),
            "selfmanaged" => Ok(IntegrationType::SelfManaged),
            _ => Err(ConfigurationError::InvalidConfiguration {
                field: "integration_type".to_string(),
                reason: format!("'{}' is not one of: cloud, self-managed", s),
            }),
        }
    }
}

/// Kind of account shown to the user.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// A project; Azure DevOps accounts are always organization-owned
    #[default]
    Org,
}

/// A user-selectable projection of a remote project.
///
/// Missing fields are normalised on load: empty strings for text, zero for the count,
/// unselected, organization type.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The project id; also the key in [`crate::Config::accounts`]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Number of repositories in the project when it was last discovered
    #[serde(default)]
    pub total_count: u64,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub selected: bool,
}

impl Account {
    /// Builds an unselected account for a project with a known repository count.
    pub fn from_project(project: &Project, repository_count: usize) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            avatar_url: None,
            total_count: repository_count as u64,
            account_type: AccountType::Org,
            public: project.is_public(),
            selected: false,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}
