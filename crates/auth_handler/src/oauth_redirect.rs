//! OAuth redirect parsing.
//!
//! Extracts the `profile` parameter from a redirect URL and maps it into an
//! [`OAuth2Auth`] credential.

use azure_devops_client::OAuth2Auth;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::{form_urlencoded, Url};

use crate::{RedirectError, RedirectResult};

#[cfg(test)]
#[path = "oauth_redirect_tests.rs"]
mod tests;

/// Base URL of the Azure DevOps cloud service.
pub const CLOUD_BASE_URL: &str = "https://dev.azure.com/";

/// Name of the query parameter carrying the encoded profile.
pub const PROFILE_PARAMETER: &str = "profile";

// Hosts are inconsistent about padding the profile.
const PROFILE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded redirect profile.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectProfile {
    // Some host SDK builds send the plural key.
    #[serde(rename = "Integration", alias = "Integrations")]
    integration: IntegrationProfile,
    #[serde(rename = "Organizations", default)]
    organizations: Vec<OrganizationProfile>,
}

#[derive(Debug, Clone, Deserialize)]
struct IntegrationProfile {
    auth: TokenProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenProfile {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    scopes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganizationProfile {
    account_name: String,
}

impl RedirectProfile {
    /// Organization the tokens were issued for, if the host sent one.
    pub fn organization(&self) -> Option<&str> {
        self.organizations
            .first()
            .map(|org| org.account_name.as_str())
    }

    /// Base URL scoped to the first organization, or the bare cloud URL.
    pub fn base_url(&self) -> String {
        format!("{}{}", CLOUD_BASE_URL, self.organization().unwrap_or_default())
    }

    /// Builds the credential, stamped with `issued_at`.
    pub fn into_auth(self, issued_at: DateTime<Utc>) -> OAuth2Auth {
        let url = self.base_url();
        let token = self.integration.auth;
        OAuth2Auth {
            url,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            scopes: token.scopes,
            issued_at,
        }
    }
}

/// Parses an OAuth redirect URL into a credential.
///
/// Returns `Ok(None)` when the URL carries no `profile` parameter, which is the normal
/// case for any page load that is not a redirect.
///
/// # Errors
///
/// Returns `RedirectError::MalformedRedirect` if the URL cannot be parsed or the
/// profile is not valid base64-encoded JSON of the expected shape.
///
/// # Example
///
/// ```rust
/// use auth_handler::parse_redirect;
/// use chrono::Utc;
///
/// let auth = parse_redirect("https://app.example.com/integration?state=1", Utc::now()).unwrap();
/// assert!(auth.is_none());
/// ```
#[instrument(skip(redirect_url))]
pub fn parse_redirect(
    redirect_url: &str,
    issued_at: DateTime<Utc>,
) -> RedirectResult<Option<OAuth2Auth>> {
    let Some(raw_profile) = profile_parameter(redirect_url)? else {
        debug!("Redirect URL has no profile parameter");
        return Ok(None);
    };

    let profile = decode_profile(&raw_profile)?;
    debug!(
        organization = profile.organization().unwrap_or("<none>"),
        "Decoded OAuth redirect profile"
    );
    Ok(Some(profile.into_auth(issued_at)))
}

/// Finds the `profile` query parameter and percent-decodes it.
///
/// Unlike form decoding, `+` is kept as-is: it is part of the base64 alphabet.
pub fn profile_parameter(redirect_url: &str) -> RedirectResult<Option<String>> {
    let url = parse_url(redirect_url)?;
    let Some(query) = url.query() else {
        return Ok(None);
    };

    let query = query.replace('+', "%2B");
    Ok(form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PROFILE_PARAMETER)
        .map(|(_, value)| value.into_owned()))
}

/// Decodes a percent-decoded profile value: base64, then JSON.
pub fn decode_profile(raw_profile: &str) -> RedirectResult<RedirectProfile> {
    let trimmed = raw_profile.trim();
    if trimmed.is_empty() {
        return Err(RedirectError::malformed("profile is empty"));
    }

    let bytes = PROFILE_ENGINE.decode(trimmed).map_err(|e| {
        warn!(error = %e, "Profile parameter is not valid base64");
        RedirectError::malformed(format!("profile is not valid base64: {}", e))
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(error = %e, "Profile parameter is not valid profile JSON");
        RedirectError::malformed(format!("profile is not valid JSON: {}", e))
    })
}

fn parse_url(redirect_url: &str) -> RedirectResult<Url> {
    match Url::parse(redirect_url) {
        Ok(url) => Ok(url),
        // Hosts sometimes hand over a path-relative location.
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .and_then(|base| base.join(redirect_url))
            .map_err(|e| RedirectError::malformed(format!("invalid redirect URL: {}", e))),
        Err(e) => Err(RedirectError::malformed(format!(
            "invalid redirect URL: {}",
            e
        ))),
    }
}
