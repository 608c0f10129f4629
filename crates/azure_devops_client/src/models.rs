//! # Models
//!
//! Wire types returned by the Azure DevOps REST API.
//!
//! Only the fields needed for account discovery are required. Everything else is
//! optional because older on-premises servers (TFS) omit several of them.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Visibility value the API uses for public projects.
pub const PUBLIC_VISIBILITY: &str = "public";

/// Represents an Azure DevOps project.
///
/// # Examples
///
/// ```
/// use azure_devops_client::models::Project;
///
/// let project: Project = serde_json::from_str(
///     r#"{"id": "p1", "name": "Platform", "visibility": "public"}"#,
/// ).unwrap();
/// assert!(project.is_public());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The project GUID
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `public` or `private`; absent on servers without public projects
    #[serde(default)]
    pub visibility: Option<String>,
    /// Lifecycle state, `wellFormed` for usable projects
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revision: Option<i64>,
    /// Not returned by TFS
    #[serde(default)]
    pub last_update_time: Option<String>,
}

impl Project {
    pub fn is_public(&self) -> bool {
        self.visibility.as_deref() == Some(PUBLIC_VISIBILITY)
    }
}

/// Represents a git repository inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    /// Full ref name, e.g. `refs/heads/main`
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Envelope used by Azure DevOps list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default)]
    #[allow(dead_code)]
    pub count: Option<u64>,
    pub value: Vec<T>,
}
