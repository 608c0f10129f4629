//! Location, credential and discovery commands.

use azure_devops_client::ApiKeyAuth;
use config_manager::IntegrationType;
use integration_core::IntegrationController;
use tracing::{info, instrument};

use crate::commands::status_cmd::status;
use crate::errors::Error;

#[cfg(test)]
#[path = "connect_cmd_tests.rs"]
mod tests;

/// Chooses where the organization is hosted.
#[instrument(skip(controller))]
pub async fn set_location(
    controller: &mut IntegrationController,
    location: IntegrationType,
) -> Result<String, Error> {
    controller.choose_location(location).await?;
    info!(location = %location, "Location chosen");
    Ok(status(controller))
}

/// Validates an API key and discovers its accounts.
#[instrument(skip(controller, api_key))]
pub async fn connect(
    controller: &mut IntegrationController,
    url: &str,
    api_key: &str,
) -> Result<String, Error> {
    controller
        .submit_credential(ApiKeyAuth::new(api_key, url))
        .await?;
    Ok(status(controller))
}

/// Applies the credential carried by an OAuth redirect URL.
#[instrument(skip(controller, url))]
pub async fn redirect(controller: &mut IntegrationController, url: &str) -> Result<String, Error> {
    let before = controller.config().oauth2_auth.clone();
    controller.handle_redirect(url).await?;

    if controller.config().oauth2_auth == before {
        return Err(Error::InvalidArguments(
            "the URL does not carry a profile parameter".to_string(),
        ));
    }
    Ok(status(controller))
}

/// Runs discovery again for the stored credential.
#[instrument(skip(controller))]
pub async fn discover(controller: &mut IntegrationController) -> Result<String, Error> {
    controller.discover().await?;
    Ok(status(controller))
}
