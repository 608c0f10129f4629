use super::*;
use crate::test_support::{controller, report};
use clap::Parser;
use config_manager::Config;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(subcommand)]
    command: Command,
}

fn parse(args: &[&str]) -> Result<Command, clap::Error> {
    TestCli::try_parse_from(std::iter::once("azdo-connect").chain(args.iter().copied()))
        .map(|cli| cli.command)
}

#[test]
fn test_parse_location_variants() {
    assert_eq!(
        parse(&["location", "cloud"]).unwrap(),
        Command::Location {
            location: IntegrationType::Cloud
        }
    );
    assert_eq!(
        parse(&["location", "self-managed"]).unwrap(),
        Command::Location {
            location: IntegrationType::SelfManaged
        }
    );
    assert!(parse(&["location", "on-prem"]).is_err());
}

#[test]
fn test_parse_connect_requires_both_flags() {
    assert_eq!(
        parse(&["connect", "--url", "https://tfs.local", "--api-key", "k"]).unwrap(),
        Command::Connect {
            url: "https://tfs.local".to_string(),
            api_key: "k".to_string(),
        }
    );
    assert!(parse(&["connect", "--url", "https://tfs.local"]).is_err());
}

#[test]
fn test_parse_select_ids_or_all() {
    assert_eq!(
        parse(&["select", "p1", "p2"]).unwrap(),
        Command::Select {
            ids: vec!["p1".to_string(), "p2".to_string()],
            all: false,
        }
    );
    assert_eq!(
        parse(&["deselect", "--all"]).unwrap(),
        Command::Deselect {
            ids: vec![],
            all: true,
        }
    );
    assert!(parse(&["select", "p1", "--all"]).is_err());
}

#[test]
fn test_version_text() {
    assert!(version_text().starts_with("azdo-connect version "));
}

#[tokio::test]
async fn test_execute_full_self_managed_flow() {
    let (mut controller, store) = controller(Config::default(), vec![Ok(report(&["p1", "p2"]))]).await;

    execute(
        &Command::Location {
            location: IntegrationType::SelfManaged,
        },
        &mut controller,
    )
    .await
    .expect("location failed");
    let output = execute(
        &Command::Connect {
            url: "https://tfs.local".to_string(),
            api_key: "k".to_string(),
        },
        &mut controller,
    )
    .await
    .expect("connect failed");
    assert!(output.contains("browsing-accounts"));

    let output = execute(
        &Command::Select {
            ids: vec!["p1".to_string()],
            all: false,
        },
        &mut controller,
    )
    .await
    .expect("select failed");
    assert!(output.contains("1 of 2 selected"));
    assert!(store.snapshot().accounts["p1"].selected);

    let output = execute(&Command::Version, &mut controller).await.unwrap();
    assert_eq!(output, version_text());
}
