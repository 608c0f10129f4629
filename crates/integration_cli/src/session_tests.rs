use super::*;
use crate::test_support::{report, ScriptedDiscovery};
use azure_devops_client::ApiKeyAuth;
use config_manager::{ConfigStore, IntegrationType};
use integration_core::Screen;
use tempfile::TempDir;

fn options(config_path: PathBuf) -> SessionOptions {
    SessionOptions {
        config_path,
        host: HostContext::default(),
        discovery: DiscoveryOptions::default(),
    }
}

#[tokio::test]
async fn test_open_session_without_file_starts_fresh() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let controller = open_session(&options(temp_dir.path().join("azdo-connect.toml")))
        .await
        .expect("open failed");

    assert_eq!(controller.screen(), Screen::ChoosingLocation);
}

#[tokio::test]
async fn test_session_state_survives_between_invocations() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("state").join("azdo-connect.toml");
    let strategy = Arc::new(ScriptedDiscovery::with_results(vec![Ok(report(&["p1"]))]));

    let mut first = open_session_with(&options(path.clone()), strategy.clone())
        .await
        .expect("open failed");
    first
        .choose_location(IntegrationType::SelfManaged)
        .await
        .expect("location failed");
    first
        .submit_credential(ApiKeyAuth::new("k", "https://tfs.local"))
        .await
        .expect("connect failed");

    let second = open_session_with(&options(path.clone()), strategy)
        .await
        .expect("reopen failed");

    assert_eq!(second.screen(), Screen::BrowsingAccounts);
    assert!(second.config().accounts.contains_key("p1"));
    let stored = FileConfigStore::new(&path).load().await.expect("load failed");
    assert_eq!(&stored, second.config());
}

#[tokio::test]
async fn test_open_session_reports_invalid_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "invalid = toml = syntax").expect("Failed to write file");

    let result = open_session(&options(path)).await;

    match result {
        Err(e) => assert_eq!(e.exit_code(), 1),
        Ok(_) => panic!("Expected an error for an invalid configuration file"),
    }
}
