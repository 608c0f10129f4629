//! Tests for OAuth redirect parsing.

use super::*;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;
use chrono::TimeZone;
use serde_json::json;

fn issued_at() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

fn encode_profile(profile: &serde_json::Value) -> String {
    STANDARD.encode(serde_json::to_string(profile).unwrap())
}

fn redirect_url(encoded_profile: &str) -> String {
    format!(
        "https://app.example.com/integrations/azure?state=abc&profile={}",
        urlencoding::encode(encoded_profile)
    )
}

fn full_profile() -> serde_json::Value {
    json!({
        "Integration": {
            "auth": {
                "accessToken": "access-123",
                "refreshToken": "refresh-456",
                "scopes": ["vso.code", "vso.project", "vso.work"]
            }
        },
        "Organizations": [
            {"accountName": "acme"},
            {"accountName": "other"}
        ]
    })
}

#[test]
fn test_parse_redirect_with_valid_profile() {
    let url = redirect_url(&encode_profile(&full_profile()));

    let auth = parse_redirect(&url, issued_at())
        .expect("parse failed")
        .expect("expected a credential");

    assert_eq!(auth.access_token, "access-123");
    assert_eq!(auth.refresh_token, "refresh-456");
    assert_eq!(auth.scopes, vec!["vso.code", "vso.project", "vso.work"]);
    assert_eq!(auth.url, "https://dev.azure.com/acme");
    assert_eq!(auth.issued_at, issued_at());
}

#[test]
fn test_parse_redirect_without_organizations_uses_cloud_root() {
    let profile = json!({
        "Integration": {"auth": {"accessToken": "a", "refreshToken": "r", "scopes": []}}
    });

    let auth = parse_redirect(&redirect_url(&encode_profile(&profile)), issued_at())
        .unwrap()
        .unwrap();

    assert_eq!(auth.url, CLOUD_BASE_URL);
    assert!(auth.scopes.is_empty());
}

#[test]
fn test_parse_redirect_accepts_plural_integration_key() {
    let profile = json!({
        "Integrations": {"auth": {"accessToken": "a", "refreshToken": "r", "scopes": ["s"]}},
        "Organizations": [{"accountName": "acme"}]
    });

    let auth = parse_redirect(&redirect_url(&encode_profile(&profile)), issued_at())
        .unwrap()
        .unwrap();

    assert_eq!(auth.access_token, "a");
}

#[test]
fn test_parse_redirect_without_profile_is_noop() {
    let result = parse_redirect(
        "https://app.example.com/integrations/azure?state=abc&code=xyz",
        issued_at(),
    );

    assert_eq!(result, Ok(None));
}

#[test]
fn test_parse_redirect_without_query_is_noop() {
    let result = parse_redirect("https://app.example.com/integrations/azure", issued_at());

    assert_eq!(result, Ok(None));
}

#[test]
fn test_parse_redirect_relative_url() {
    let url = format!(
        "/integrations/azure?profile={}",
        urlencoding::encode(&encode_profile(&full_profile()))
    );

    let auth = parse_redirect(&url, issued_at()).unwrap().unwrap();

    assert_eq!(auth.access_token, "access-123");
}

#[test]
fn test_parse_redirect_keeps_unencoded_plus() {
    let profile = json!({
        "Integration": {"auth": {"accessToken": "tok>>>", "refreshToken": "r", "scopes": ["vso.code"]}}
    });
    let encoded = encode_profile(&profile);
    assert!(encoded.contains('+'), "fixture must exercise '+': {encoded}");

    // The host did not percent-encode the value
    let url = format!("https://app.example.com/cb?profile={}", encoded);
    let auth = parse_redirect(&url, issued_at()).unwrap().unwrap();

    assert_eq!(auth.access_token, "tok>>>");
}

#[test]
fn test_parse_redirect_accepts_unpadded_base64() {
    let encoded = STANDARD_NO_PAD.encode(serde_json::to_string(&full_profile()).unwrap());

    let auth = parse_redirect(&redirect_url(&encoded), issued_at())
        .unwrap()
        .unwrap();

    assert_eq!(auth.refresh_token, "refresh-456");
}

#[test]
fn test_parse_redirect_invalid_base64_is_malformed() {
    let result = parse_redirect(&redirect_url("!!!not-base64!!!"), issued_at());

    match result {
        Err(RedirectError::MalformedRedirect { reason }) => {
            assert!(reason.contains("base64"), "unexpected reason: {reason}")
        }
        other => panic!("Expected MalformedRedirect, got {other:?}"),
    }
}

#[test]
fn test_parse_redirect_invalid_json_is_malformed() {
    let encoded = STANDARD.encode("{\"Integration\": ");

    let result = parse_redirect(&redirect_url(&encoded), issued_at());

    match result {
        Err(RedirectError::MalformedRedirect { reason }) => {
            assert!(reason.contains("JSON"), "unexpected reason: {reason}")
        }
        other => panic!("Expected MalformedRedirect, got {other:?}"),
    }
}

#[test]
fn test_parse_redirect_wrong_shape_is_malformed() {
    let encoded = encode_profile(&json!({"Integration": {"auth": {"accessToken": "only"}}}));

    let result = parse_redirect(&redirect_url(&encoded), issued_at());

    assert!(matches!(
        result,
        Err(RedirectError::MalformedRedirect { .. })
    ));
}

#[test]
fn test_parse_redirect_empty_profile_is_malformed() {
    let result = parse_redirect("https://app.example.com/cb?profile=", issued_at());

    assert!(matches!(
        result,
        Err(RedirectError::MalformedRedirect { .. })
    ));
}

#[test]
fn test_parse_redirect_is_deterministic_for_same_time() {
    let url = redirect_url(&encode_profile(&full_profile()));

    let first = parse_redirect(&url, issued_at()).unwrap();
    let second = parse_redirect(&url, issued_at()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_profile_parameter_ignores_similar_keys() {
    let url = "https://app.example.com/cb?profile_id=1&myprofile=2";

    assert_eq!(profile_parameter(url), Ok(None));
}

#[test]
fn test_profile_parameter_decodes_key_and_keeps_plus() {
    let url = "https://app.example.com/cb?state=a+b&prof%69le=ab+c%2Bd%3D%3D";

    assert_eq!(profile_parameter(url), Ok(Some("ab+c+d==".to_string())));
}

#[test]
fn test_profile_parameter_takes_first_occurrence() {
    let url = "https://app.example.com/cb?profile=first&profile=second";

    assert_eq!(profile_parameter(url), Ok(Some("first".to_string())));
}

#[test]
fn test_malformed_error_message() {
    let error = RedirectError::malformed("profile is empty");

    assert_eq!(
        error.to_string(),
        "Malformed OAuth redirect: profile is empty"
    );
}
