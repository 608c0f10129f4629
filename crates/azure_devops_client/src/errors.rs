//! Error types for Azure DevOps client operations.
//!
//! This module defines the error types that can occur when talking to the Azure DevOps
//! REST API through the azure_devops_client crate.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during Azure DevOps client operations.
///
/// Every remote call either succeeds with a typed value or fails with one of these
/// variants. The client never retries; callers decide whether a failure aborts their
/// operation or is skipped.
///
/// ## Examples
///
/// ```rust,ignore
/// use azure_devops_client::Error;
///
/// match client.list_projects(&auth).await {
///     Ok(projects) => println!("Found {} projects", projects.len()),
///     Err(Error::UnexpectedStatus { status, .. }) => eprintln!("Rejected with {}", status),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The server answered with something other than HTTP 200.
    ///
    /// A 401 or 403 here usually means the credential was rejected. The URL is kept
    /// for logging; it never contains credentials because those travel in headers.
    #[error("Azure DevOps returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The request never produced an HTTP response.
    ///
    /// This covers DNS failures, refused connections, TLS errors and timeouts raised
    /// by the transport.
    #[error("Transport failure calling {url}: {message}")]
    Transport { url: String, message: String },

    /// A 200 response carried a body that does not match the expected shape.
    #[error("Failed to deserialize Azure DevOps response: {0}")]
    Deserialization(String),

    /// The credential's base URL could not be turned into a request URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl Error {
    /// The HTTP status code, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened below HTTP, before any status was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Deserialization(value.to_string())
    }
}
