//! Authentication handling for the Azure DevOps integration
//!
//! This crate turns the cloud OAuth2 redirect into a credential the discovery client can
//! use. The host finishes the OAuth dance on its side and sends the user back to the
//! integration with a `profile` query parameter holding the issued tokens.
//!
//! ## Redirect contract
//!
//! The `profile` value is URL-encoded base64 of:
//!
//! ```json
//! {
//!   "Integration": { "auth": { "accessToken": "...", "refreshToken": "...", "scopes": ["..."] } },
//!   "Organizations": [ { "accountName": "acme" } ]
//! }
//! ```

mod oauth_redirect;

pub use oauth_redirect::{
    decode_profile, parse_redirect, profile_parameter, RedirectProfile, CLOUD_BASE_URL,
    PROFILE_PARAMETER,
};

/// Result type for redirect handling
pub type RedirectResult<T> = std::result::Result<T, RedirectError>;

/// Errors that can occur while handling an OAuth redirect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectError {
    /// The `profile` parameter was present but could not be decoded.
    ///
    /// Surfaced to the user; the configuration is left untouched.
    #[error("Malformed OAuth redirect: {reason}")]
    MalformedRedirect { reason: String },
}

impl RedirectError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RedirectError::MalformedRedirect {
            reason: reason.into(),
        }
    }
}
