//! Command modules for the azdo-connect CLI.
//!
//! Each invocation loads the stored configuration, applies one command through the
//! integration controller and prints the resulting state:
//!
//! - `status_cmd`: shows the current screen and what to do next
//! - `connect_cmd`: location choice, credentials, OAuth redirects and discovery
//! - `accounts_cmd`: listing and selecting discovered accounts

use clap::Subcommand;
use config_manager::IntegrationType;
use integration_core::IntegrationController;
use tracing::instrument;

use crate::errors::Error;

pub mod accounts_cmd;
pub mod connect_cmd;
pub mod status_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the current state of the integration
    Status,

    /// Choose where the Azure DevOps organization is hosted
    Location {
        /// `cloud` or `self-managed`
        #[arg(value_parser = parse_location)]
        location: IntegrationType,
    },

    /// Connect a self-managed server with an API key
    Connect {
        /// Collection URL, e.g. https://tfs.example.com/DefaultCollection
        #[arg(long)]
        url: String,

        /// Personal access token
        #[arg(long)]
        api_key: String,
    },

    /// Complete the cloud OAuth flow with the URL the browser was redirected to
    Redirect {
        /// Redirect URL carrying the `profile` parameter
        url: String,
    },

    /// Discover the accounts visible to the stored credential again
    Discover,

    /// List discovered accounts
    Accounts,

    /// Enable accounts for ingestion
    Select {
        /// Account (project) ids
        ids: Vec<String>,

        /// Select every account
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },

    /// Disable accounts for ingestion
    Deselect {
        /// Account (project) ids
        ids: Vec<String>,

        /// Deselect every account
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },

    /// Show the CLI version
    Version,
}

pub fn parse_location(s: &str) -> Result<IntegrationType, String> {
    s.parse::<IntegrationType>().map_err(|e| e.to_string())
}

/// Version string baked into the binary.
pub fn version_text() -> String {
    format!(
        "azdo-connect version {}",
        option_env!("AZDO_CONNECT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
    )
}

/// Executes a command against an open session and returns the text to print.
#[instrument(skip_all)]
pub async fn execute(command: &Command, controller: &mut IntegrationController) -> Result<String, Error> {
    match command {
        Command::Status => Ok(status_cmd::status(controller)),
        Command::Location { location } => connect_cmd::set_location(controller, *location).await,
        Command::Connect { url, api_key } => connect_cmd::connect(controller, url, api_key).await,
        Command::Redirect { url } => connect_cmd::redirect(controller, url).await,
        Command::Discover => connect_cmd::discover(controller).await,
        Command::Accounts => accounts_cmd::list_accounts(controller).await,
        Command::Select { ids, all } => accounts_cmd::set_selected(controller, ids, *all, true).await,
        Command::Deselect { ids, all } => {
            accounts_cmd::set_selected(controller, ids, *all, false).await
        }
        Command::Version => Ok(version_text()),
    }
}
