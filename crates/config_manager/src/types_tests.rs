use super::*;

fn project(id: &str, visibility: Option<&str>, description: Option<&str>) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {id}"),
        description: description.map(str::to_string),
        visibility: visibility.map(str::to_string),
        state: Some("wellFormed".to_string()),
        url: None,
        revision: None,
        last_update_time: None,
    }
}

#[test]
fn test_integration_type_wire_values() {
    assert_eq!(
        serde_json::to_string(&IntegrationType::Cloud).unwrap(),
        "\"CLOUD\""
    );
    assert_eq!(
        serde_json::to_string(&IntegrationType::SelfManaged).unwrap(),
        "\"SELFMANAGED\""
    );
    let parsed: IntegrationType = serde_json::from_str("\"SELFMANAGED\"").unwrap();
    assert_eq!(parsed, IntegrationType::SelfManaged);
}

#[test]
fn test_integration_type_from_str_variants() {
    for input in ["cloud", "CLOUD", "Cloud"] {
        assert_eq!(input.parse::<IntegrationType>(), Ok(IntegrationType::Cloud));
    }
    for input in ["self-managed", "selfmanaged", "SELF_MANAGED", "SELFMANAGED"] {
        assert_eq!(
            input.parse::<IntegrationType>(),
            Ok(IntegrationType::SelfManaged)
        );
    }
}

#[test]
fn test_integration_type_from_str_rejects_unknown() {
    let result = "on-prem".parse::<IntegrationType>();

    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidConfiguration { .. })
    ));
}

#[test]
fn test_account_from_public_project() {
    let account = Account::from_project(&project("p1", Some("public"), Some("Docs")), 3);

    assert_eq!(account.id, "p1");
    assert_eq!(account.name, "Project p1");
    assert_eq!(account.description, "Docs");
    assert_eq!(account.total_count, 3);
    assert!(account.public);
    assert!(!account.selected);
    assert_eq!(account.account_type, AccountType::Org);
}

#[test]
fn test_account_from_private_project_without_description() {
    let account = Account::from_project(&project("p2", Some("private"), None), 0);

    assert_eq!(account.description, "");
    assert_eq!(account.total_count, 0);
    assert!(!account.public);
}

#[test]
fn test_account_wire_format_is_camel_case() {
    let account = Account::from_project(&project("p1", Some("public"), None), 7).with_selected(true);

    let value = serde_json::to_value(&account).unwrap();

    assert_eq!(value["totalCount"], 7);
    assert_eq!(value["type"], "ORG");
    assert_eq!(value["public"], true);
    assert_eq!(value["selected"], true);
    assert!(value.get("avatarUrl").is_none());
}

#[test]
fn test_account_load_normalises_missing_fields() {
    let account: Account = serde_json::from_str(r#"{"id": "p9"}"#).unwrap();

    assert_eq!(account.name, "");
    assert_eq!(account.description, "");
    assert_eq!(account.total_count, 0);
    assert_eq!(account.account_type, AccountType::Org);
    assert!(!account.public);
    assert!(!account.selected);
}
