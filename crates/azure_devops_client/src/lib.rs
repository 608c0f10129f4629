//! Crate for interacting with the Azure DevOps REST API.
//!
//! This crate provides the two read-only calls used for account discovery: listing the
//! projects visible to a credential and listing the git repositories of one project.
//! Requests are authenticated with either an API key or an OAuth2 bearer token, see
//! [`Auth`]. The HTTP layer is pluggable through [`HttpTransport`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod auth;
pub use auth::{auth_header, ApiKeyAuth, Auth, OAuth2Auth};

pub mod errors;
pub use errors::Error;

pub mod models;
pub use models::{Project, Repository};

pub mod transport;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// REST API version pinned for every request.
pub const API_VERSION: &str = "5.1";

/// Read operations needed to discover accounts.
///
/// Neither call retries. Anything other than HTTP 200 is reported as
/// [`Error::UnexpectedStatus`] and the caller decides what that means.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Lists the projects visible to the credential.
    ///
    /// Calls `GET {auth.url}/_apis/projects?api-version=5.1`.
    async fn list_projects(&self, auth: &Auth) -> Result<Vec<Project>, Error>;

    /// Lists the git repositories of a single project.
    ///
    /// Calls `GET {auth.url}/{project_id}/_apis/git/repositories?api-version=5.1`.
    async fn list_repositories(
        &self,
        project_id: &str,
        auth: &Auth,
    ) -> Result<Vec<Repository>, Error>;
}

/// A client for the Azure DevOps REST API.
///
/// # Example
///
/// ```rust,no_run
/// use azure_devops_client::{ApiKeyAuth, Auth, AzureDevOpsClient, DiscoveryClient};
///
/// # async fn example() -> Result<(), azure_devops_client::Error> {
/// let client = AzureDevOpsClient::new();
/// let auth = Auth::ApiKey(ApiKeyAuth::new("my-pat", "https://dev.azure.com/acme"));
///
/// for project in client.list_projects(&auth).await? {
///     let repos = client.list_repositories(&project.id, &auth).await?;
///     println!("{}: {} repositories", project.name, repos.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient<T = ReqwestTransport> {
    transport: T,
}

impl AzureDevOpsClient<ReqwestTransport> {
    /// Creates a client using the default reqwest transport.
    pub fn new() -> Self {
        Self {
            transport: ReqwestTransport::new(),
        }
    }
}

impl Default for AzureDevOpsClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpTransport> AzureDevOpsClient<T> {
    /// Creates a client on top of a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    async fn get_list<M: DeserializeOwned>(&self, url: &str, auth: &Auth) -> Result<Vec<M>, Error> {
        let authorization = auth.header_value();
        let headers = [
            ("Authorization", authorization.as_str()),
            ("Accept", "application/json"),
        ];

        let response = self.transport.get(url, &headers).await.map_err(|e| {
            warn!(url = url, error = %e, "Request to Azure DevOps failed");
            e
        })?;

        if response.status != 200 {
            warn!(
                url = url,
                status = response.status,
                "Azure DevOps returned a non-success status"
            );
            return Err(Error::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }

        let list: models::ListResponse<M> = serde_json::from_str(&response.body)?;
        Ok(list.value)
    }
}

#[async_trait]
impl<T: HttpTransport> DiscoveryClient for AzureDevOpsClient<T> {
    #[instrument(skip(self, auth), fields(base_url = %auth.base_url()))]
    async fn list_projects(&self, auth: &Auth) -> Result<Vec<Project>, Error> {
        info!("Fetching projects");

        let url = projects_url(auth.base_url())?;
        let projects: Vec<Project> = self.get_list(&url, auth).await?;

        info!(project_count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    #[instrument(skip(self, auth), fields(base_url = %auth.base_url()))]
    async fn list_repositories(
        &self,
        project_id: &str,
        auth: &Auth,
    ) -> Result<Vec<Repository>, Error> {
        debug!(project_id = project_id, "Fetching repositories");

        let url = repositories_url(auth.base_url(), project_id)?;
        let repositories: Vec<Repository> = self.get_list(&url, auth).await?;

        debug!(
            project_id = project_id,
            repository_count = repositories.len(),
            "Fetched repositories"
        );
        Ok(repositories)
    }
}

/// URL of the project list endpoint for a base URL.
pub fn projects_url(base_url: &str) -> Result<String, Error> {
    endpoint_url(base_url, &["_apis", "projects"])
}

/// URL of the repository list endpoint for a project.
///
/// The project id is escaped as a single path segment.
pub fn repositories_url(base_url: &str, project_id: &str) -> Result<String, Error> {
    endpoint_url(base_url, &[project_id, "_apis", "git", "repositories"])
}

fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<String, Error> {
    let invalid = |reason: String| Error::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be used as a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut().append_pair("api-version", API_VERSION);

    Ok(url.to_string())
}
