//! Credential types for Azure DevOps requests.
//!
//! A request is authenticated either with a static API key (personal access token) or
//! with an OAuth2 bearer token obtained through the cloud redirect flow. Both shapes
//! are serialized exactly as the host stores them in the integration configuration.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Static API-key credential used by self-managed (and some cloud) installations.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyAuth {
    /// Personal access token
    pub apikey: String,
    /// Base URL of the collection or organization, e.g. `https://tfs.example.com/DefaultCollection`
    pub url: String,
}

impl ApiKeyAuth {
    pub fn new(apikey: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            apikey: apikey.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("apikey", &"<REDACTED>")
            .field("url", &self.url)
            .finish()
    }
}

/// OAuth2 credential produced by the cloud redirect flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Auth {
    /// Organization-scoped base URL, e.g. `https://dev.azure.com/acme`
    pub url: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// When the token was handed to us. Stored as epoch milliseconds.
    #[serde(rename = "date_ts", with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
}

impl OAuth2Auth {
    /// Whether both values carry the same grant, ignoring when each was issued.
    pub fn same_grant(&self, other: &OAuth2Auth) -> bool {
        self.url == other.url
            && self.access_token == other.access_token
            && self.refresh_token == other.refresh_token
            && self.scopes == other.scopes
    }
}

impl std::fmt::Debug for OAuth2Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Auth")
            .field("url", &self.url)
            .field("access_token", &"<REDACTED>")
            .field("refresh_token", &"<REDACTED>")
            .field("scopes", &self.scopes)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// How a request is authenticated.
///
/// Values are immutable; re-authentication replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    ApiKey(ApiKeyAuth),
    OAuth2(OAuth2Auth),
}

impl Auth {
    /// The base URL that request paths are appended to.
    pub fn base_url(&self) -> &str {
        match self {
            Auth::ApiKey(auth) => &auth.url,
            Auth::OAuth2(auth) => &auth.url,
        }
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        auth_header(self)
    }
}

impl From<ApiKeyAuth> for Auth {
    fn from(value: ApiKeyAuth) -> Self {
        Auth::ApiKey(value)
    }
}

impl From<OAuth2Auth> for Auth {
    fn from(value: OAuth2Auth) -> Self {
        Auth::OAuth2(value)
    }
}

/// Builds the `Authorization` header for a credential.
///
/// API keys use basic auth with an empty user name (`"Basic " + base64(":" + apikey)`),
/// OAuth2 tokens are sent as bearer tokens.
///
/// # Example
///
/// ```rust
/// use azure_devops_client::{auth_header, ApiKeyAuth, Auth};
///
/// let auth = Auth::ApiKey(ApiKeyAuth::new("abc", "https://dev.azure.com/acme"));
/// assert_eq!(auth_header(&auth), "Basic OmFiYw==");
/// ```
pub fn auth_header(auth: &Auth) -> String {
    match auth {
        Auth::ApiKey(key) => format!("Basic {}", STANDARD.encode(format!(":{}", key.apikey))),
        Auth::OAuth2(oauth) => format!("Bearer {}", oauth.access_token),
    }
}
