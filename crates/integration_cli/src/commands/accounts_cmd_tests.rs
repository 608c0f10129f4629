use super::*;
use crate::test_support::{account, controller, report};
use azure_devops_client::{ApiKeyAuth, Auth};
use config_manager::IntegrationType;
use integration_core::IntegrationError;

fn browsing(accounts: &[config_manager::Account]) -> Config {
    Config::default()
        .with_integration_type(IntegrationType::SelfManaged)
        .with_auth(Auth::ApiKey(ApiKeyAuth::new("k", "https://tfs.local")))
        .with_accounts(accounts.iter().map(|a| (a.id.clone(), a.clone())).collect())
}

#[test]
fn test_render_accounts_table() {
    let mut public = account("p1", true);
    public.public = true;
    public.total_count = 3;
    public.description = "Core services".to_string();
    let config = browsing(&[public, account("p2", false)]);

    let output = render_accounts(&config);

    assert!(output.contains("p1"));
    assert!(output.contains("3 repositories, public"));
    assert!(output.contains("Core services"));
    assert!(output.contains("2 repositories, private"));
    assert!(output.ends_with("1 of 2 selected"));
}

#[test]
fn test_render_without_accounts() {
    assert_eq!(render_accounts(&Config::default()), "No accounts discovered");
}

#[tokio::test]
async fn test_list_accounts_discovers_stored_credential() {
    let (mut controller, store) = controller(browsing(&[]), vec![Ok(report(&["p1", "p2"]))]).await;

    let output = list_accounts(&mut controller).await.expect("list failed");

    assert!(output.contains("0 of 2 selected"));
    assert_eq!(store.snapshot().accounts.len(), 2);
}

#[tokio::test]
async fn test_select_and_deselect_all() {
    let (mut controller, store) =
        controller(browsing(&[account("p1", false), account("p2", false)]), vec![]).await;

    let output = set_selected(&mut controller, &[], true, true)
        .await
        .expect("select failed");
    assert!(output.contains("2 of 2 selected"));

    set_selected(&mut controller, &["p2".to_string()], false, false)
        .await
        .expect("deselect failed");

    let stored = store.snapshot();
    assert!(stored.accounts["p1"].selected);
    assert!(!stored.accounts["p2"].selected);
}

#[tokio::test]
async fn test_select_without_ids_is_usage_error() {
    let (mut controller, _store) = controller(browsing(&[account("p1", false)]), vec![]).await;

    let result = set_selected(&mut controller, &[], false, true).await;

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
}

#[tokio::test]
async fn test_select_unknown_account_fails() {
    let (mut controller, _store) = controller(browsing(&[account("p1", false)]), vec![]).await;

    let result = set_selected(&mut controller, &["p9".to_string()], false, true).await;

    assert!(matches!(
        result,
        Err(Error::Integration(IntegrationError::UnknownAccount { .. }))
    ));
}
