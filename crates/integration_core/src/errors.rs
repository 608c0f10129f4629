//! Error taxonomy for the integration workflow.
//!
//! Nothing here is fatal to the host. Every failure either drives a transition or is
//! shown to the user next to the current screen.

use auth_handler::RedirectError;
use config_manager::ConfigurationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Result type for integration operations
pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// Errors surfaced by discovery and by the integration controller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntegrationError {
    /// The redirect carried a `profile` parameter that could not be decoded.
    #[error("Malformed OAuth redirect: {reason}")]
    MalformedRedirect { reason: String },

    /// Validating the credential failed, so discovery could not start.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    #[error("Credential rejected by Azure DevOps{}: {reason}", status_suffix(.status))]
    AuthRejected { status: Option<u16>, reason: String },

    /// Some projects could not be enumerated and were left out.
    #[error("{} project(s) could not be discovered", .failed_projects.len())]
    PartialDiscoveryFailure { failed_projects: Vec<ProjectFailure> },

    /// A request never produced an HTTP response.
    #[error("Transport failure: {reason}")]
    TransportFailure { reason: String },

    #[error("Unknown account '{id}'")]
    UnknownAccount { id: String },

    /// The event does not apply to the current state.
    #[error("Invalid transition: {reason}")]
    InvalidTransition { reason: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl IntegrationError {
    pub fn invalid_transition(reason: impl Into<String>) -> Self {
        IntegrationError::InvalidTransition {
            reason: reason.into(),
        }
    }

    /// Reclassifies a failure of the initial credential check.
    ///
    /// Whatever went wrong while validating, the user has to re-enter credentials, so
    /// a transport failure at this stage is reported as a rejection without a status.
    pub fn into_validation_failure(self) -> Self {
        match self {
            IntegrationError::TransportFailure { reason } => IntegrationError::AuthRejected {
                status: None,
                reason,
            },
            other => other,
        }
    }

    /// Whether the user has to supply credentials again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, IntegrationError::AuthRejected { .. })
    }
}

impl From<RedirectError> for IntegrationError {
    fn from(value: RedirectError) -> Self {
        match value {
            RedirectError::MalformedRedirect { reason } => {
                IntegrationError::MalformedRedirect { reason }
            }
        }
    }
}

impl From<azure_devops_client::Error> for IntegrationError {
    fn from(value: azure_devops_client::Error) -> Self {
        if value.is_transport() {
            IntegrationError::TransportFailure {
                reason: value.to_string(),
            }
        } else {
            IntegrationError::AuthRejected {
                status: value.status(),
                reason: value.to_string(),
            }
        }
    }
}

/// A project left out of discovery, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFailure {
    pub project_id: String,
    pub project_name: String,
    pub status: Option<u16>,
    pub reason: String,
}

impl ProjectFailure {
    pub fn new(project_id: &str, project_name: &str, error: &azure_devops_client::Error) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            status: error.status(),
            reason: error.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" (HTTP {})", status),
        None => String::new(),
    }
}
