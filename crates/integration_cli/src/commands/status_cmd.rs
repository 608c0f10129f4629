use colored::Colorize;
use integration_core::{IntegrationController, Screen, SessionState};

#[cfg(test)]
#[path = "status_cmd_tests.rs"]
mod tests;

/// Renders the state of the session.
pub fn status(controller: &IntegrationController) -> String {
    render_status(controller.state())
}

/// Formats a session state for the terminal.
pub fn render_status(state: &SessionState) -> String {
    let config = state.config();
    let screen = state.screen();
    let mut output = String::new();

    output.push_str(&format!("Screen: {}\n", screen.to_string().bold()));

    if let Some(location) = config.integration_type {
        output.push_str(&format!("Location: {}\n", location));
    }

    if let Some(auth) = config.auth() {
        let kind = if config.oauth2_auth.is_some() {
            "OAuth2"
        } else {
            "API key"
        };
        output.push_str(&format!("Credential: {} for {}\n", kind, auth.base_url()));
    }

    if !config.accounts.is_empty() {
        output.push_str(&format!(
            "Accounts: {} ({} selected)\n",
            config.accounts.len(),
            config.selected_count()
        ));
    }

    let install = if state.install_enabled() {
        "yes".green()
    } else {
        "no".red()
    };
    output.push_str(&format!("Install enabled: {}\n", install));

    if let Some(warning) = state.warning() {
        output.push_str(&format!("{} {}\n", "Warning:".yellow(), warning));
    }
    if let Some(error) = state.error() {
        output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        if error.is_auth_failure() {
            output.push_str("The credential was not accepted, check the URL and the token\n");
        }
    }

    output.push_str(&format!("Next: {}", next_step(screen)));
    output
}

/// What the user can do from a screen.
pub fn next_step(screen: Screen) -> &'static str {
    match screen {
        Screen::ChoosingLocation => "azdo-connect location <cloud|self-managed>",
        Screen::AwaitingCloudAuth | Screen::ReAuthCloud => {
            "sign in through the host, then azdo-connect redirect <URL>"
        }
        Screen::AwaitingSelfManagedAuth | Screen::ReAuthSelfManaged => {
            "azdo-connect connect --url <URL> --api-key <KEY>"
        }
        Screen::Validating => "azdo-connect discover",
        Screen::BrowsingAccounts => "azdo-connect select <ID>... or azdo-connect select --all",
        Screen::Loading => "wait for the host to finish",
    }
}
