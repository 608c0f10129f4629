//! Account listing and selection commands.

use colored::Colorize;
use config_manager::Config;
use integration_core::IntegrationController;
use tracing::{info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "accounts_cmd_tests.rs"]
mod tests;

/// Lists the accounts, discovering them first if the credential was never enumerated.
#[instrument(skip(controller))]
pub async fn list_accounts(controller: &mut IntegrationController) -> Result<String, Error> {
    controller.resume().await?;
    Ok(render_accounts(controller.config()))
}

/// Selects or deselects accounts by id, or all of them.
#[instrument(skip(controller))]
pub async fn set_selected(
    controller: &mut IntegrationController,
    ids: &[String],
    all: bool,
    selected: bool,
) -> Result<String, Error> {
    if all {
        controller.select_all(selected).await?;
    } else if ids.is_empty() {
        return Err(Error::InvalidArguments(
            "give at least one account id or --all".to_string(),
        ));
    } else {
        for id in ids {
            controller.select_account(id, selected).await?;
        }
    }

    info!(
        selected_count = controller.config().selected_count(),
        install_enabled = controller.state().install_enabled(),
        "Selection updated"
    );
    Ok(render_accounts(controller.config()))
}

/// Formats the account table.
pub fn render_accounts(config: &Config) -> String {
    if config.accounts.is_empty() {
        return "No accounts discovered".to_string();
    }

    let mut output = String::new();
    for account in config.accounts_list() {
        let marker = if account.selected {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let visibility = if account.public { "public" } else { "private" };
        output.push_str(&format!(
            "{} {}  {}  {} repositories, {}\n",
            marker,
            account.id,
            account.name.bold(),
            account.total_count,
            visibility
        ));
        if !account.description.is_empty() {
            output.push_str(&format!("      {}\n", account.description));
        }
    }
    output.push_str(&format!(
        "{} of {} selected",
        config.selected_count(),
        config.accounts.len()
    ));
    output
}
