use clap::Parser;
use integration_cli::commands::{execute, version_text, Command};
use integration_cli::config::get_config_path;
use integration_cli::session::{open_session, SessionOptions};
use integration_core::{DiscoveryOptions, HostContext, DEFAULT_CONCURRENCY};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// azdo-connect: connect an Azure DevOps organization and choose the projects to ingest
#[derive(Parser)]
#[command(name = "azdo-connect")]
#[command(about = "Connect an Azure DevOps organization and choose the projects to ingest", long_about = None)]
struct Cli {
    /// Path to the integration configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// The integration is already installed
    #[arg(long, global = true)]
    installed: bool,

    /// Replace the stored credential
    #[arg(long, global = true)]
    reauth: bool,

    /// Maximum number of concurrent repository listings during discovery
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("AZDO_CONNECT_LOG"))
        .init();

    let cli = Cli::parse();
    if cli.command == Command::Version {
        println!("{}", version_text());
        std::process::exit(0);
    }

    let options = SessionOptions {
        config_path: get_config_path(cli.config.as_deref()),
        host: HostContext {
            installed: cli.installed,
            reauth: cli.reauth,
        },
        discovery: DiscoveryOptions::with_concurrency(cli.concurrency),
    };

    let mut controller = match open_session(&options).await {
        Ok(controller) => controller,
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };

    match execute(&cli.command, &mut controller).await {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            println!("{}", integration_cli::commands::status_cmd::status(&controller));
            std::process::exit(e.exit_code());
        }
    }
}
