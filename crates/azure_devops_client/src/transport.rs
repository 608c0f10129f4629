//! HTTP transport seam.
//!
//! The discovery client only needs `GET url with headers -> (status, body)`. Retry,
//! proxy and timeout policy belong to whoever implements [`HttpTransport`].

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::Error;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal GET primitive used by the discovery client.
///
/// Implementations must not interpret the status code; a non-200 response is still
/// `Ok`. Only failures that prevent a response from being received are errors, and
/// those should be reported as [`Error::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, Error>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client, e.g. one with a timeout or proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, headers))]
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Error::Transport {
            url: url.to_string(),
            message: format!("Failed to read response body: {}", e),
        })?;

        debug!(status = status, body_length = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }
}
