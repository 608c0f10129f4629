//! Opening an integration session backed by a configuration file.

use config_manager::FileConfigStore;
use integration_core::{
    DiscoveryOptions, DiscoveryStrategy, HostContext, IntegrationController, RestDiscovery,
    TracingSignals,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// How a CLI invocation sets up its session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub config_path: PathBuf,
    pub host: HostContext,
    pub discovery: DiscoveryOptions,
}

/// Opens a session that discovers accounts through the REST API.
pub async fn open_session(options: &SessionOptions) -> Result<IntegrationController, Error> {
    let strategy = Arc::new(RestDiscovery::new().with_options(options.discovery));
    open_session_with(options, strategy).await
}

/// Opens a session with a custom discovery strategy.
#[instrument(skip(strategy))]
pub async fn open_session_with(
    options: &SessionOptions,
    strategy: Arc<dyn DiscoveryStrategy>,
) -> Result<IntegrationController, Error> {
    let store = Arc::new(FileConfigStore::new(&options.config_path));
    let controller =
        IntegrationController::start(store, Arc::new(TracingSignals), strategy, options.host)
            .await?;

    info!(
        path = ?options.config_path,
        screen = %controller.screen(),
        "Session opened"
    );
    Ok(controller)
}
