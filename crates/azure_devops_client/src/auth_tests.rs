use super::*;
use base64::Engine as _;
use chrono::TimeZone;

fn oauth(token: &str) -> OAuth2Auth {
    OAuth2Auth {
        url: "https://dev.azure.com/acme".to_string(),
        access_token: token.to_string(),
        refresh_token: "refresh-123".to_string(),
        scopes: vec!["vso.code".to_string(), "vso.project".to_string()],
        issued_at: Utc.timestamp_millis_opt(1_600_000_000_123).unwrap(),
    }
}

#[test]
fn test_api_key_header_uses_basic_with_empty_user() {
    let auth = Auth::ApiKey(ApiKeyAuth::new("abc", "https://tfs.local"));

    assert_eq!(auth_header(&auth), "Basic OmFiYw==");
    assert_eq!(
        auth_header(&auth),
        format!("Basic {}", STANDARD.encode(":abc"))
    );
}

#[test]
fn test_oauth_header_uses_bearer() {
    let auth = Auth::OAuth2(oauth("token-xyz"));

    assert_eq!(auth_header(&auth), "Bearer token-xyz");
    assert_eq!(auth.header_value(), "Bearer token-xyz");
}

#[test]
fn test_base_url_for_both_variants() {
    let key = Auth::from(ApiKeyAuth::new("k", "https://tfs.local/DefaultCollection"));
    let token = Auth::from(oauth("t"));

    assert_eq!(key.base_url(), "https://tfs.local/DefaultCollection");
    assert_eq!(token.base_url(), "https://dev.azure.com/acme");
}

#[test]
fn test_debug_output_redacts_secrets() {
    let key = format!("{:?}", ApiKeyAuth::new("super-secret", "https://tfs.local"));
    let token = format!("{:?}", oauth("very-secret-token"));

    assert!(!key.contains("super-secret"));
    assert!(key.contains("<REDACTED>"));
    assert!(!token.contains("very-secret-token"));
    assert!(!token.contains("refresh-123"));
    assert!(token.contains("vso.code"));
}

#[test]
fn test_oauth_serializes_issue_time_as_millis() {
    let value = serde_json::to_value(oauth("t")).expect("Failed to serialize OAuth2Auth");

    assert_eq!(value["date_ts"], 1_600_000_000_123_i64);
    assert_eq!(value["access_token"], "t");
    assert_eq!(value["refresh_token"], "refresh-123");

    let parsed: OAuth2Auth = serde_json::from_value(value).expect("Failed to deserialize");
    assert_eq!(parsed, oauth("t"));
}

#[test]
fn test_oauth_missing_scopes_defaults_to_empty() {
    let json = r#"{
        "url": "https://dev.azure.com/acme",
        "access_token": "a",
        "refresh_token": "r",
        "date_ts": 0
    }"#;

    let parsed: OAuth2Auth = serde_json::from_str(json).expect("Failed to deserialize");

    assert!(parsed.scopes.is_empty());
}

#[test]
fn test_same_grant_ignores_issue_time() {
    let first = oauth("access-1");
    let mut reissued = first.clone();
    reissued.issued_at = Utc.timestamp_millis_opt(1_600_000_030_000).unwrap();

    assert!(first.same_grant(&reissued));
    assert!(!first.same_grant(&oauth("access-2")));
}
