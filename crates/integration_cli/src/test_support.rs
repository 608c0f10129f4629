//! Shared fixtures for the command tests.

use async_trait::async_trait;
use azure_devops_client::Auth;
use config_manager::{Account, AccountType, Config, MemoryConfigStore};
use integration_core::{
    DiscoveryReport, DiscoveryStrategy, HostContext, IntegrationController, IntegrationResult,
    TracingSignals,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Discovery strategy answering from a script, one result per call.
#[derive(Default)]
pub struct ScriptedDiscovery {
    results: Mutex<VecDeque<IntegrationResult<DiscoveryReport>>>,
}

impl ScriptedDiscovery {
    pub fn with_results(results: Vec<IntegrationResult<DiscoveryReport>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for ScriptedDiscovery {
    async fn discover(&self, _auth: &Auth, _config: &Config) -> IntegrationResult<DiscoveryReport> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DiscoveryReport::default()))
    }
}

pub fn account(id: &str, selected: bool) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Project {id}"),
        description: String::new(),
        avatar_url: None,
        total_count: 2,
        account_type: AccountType::Org,
        public: false,
        selected,
    }
}

pub fn report(ids: &[&str]) -> DiscoveryReport {
    DiscoveryReport::from_accounts(ids.iter().map(|id| account(id, false)).collect())
}

/// Starts a controller over an in-memory store.
pub async fn controller(
    config: Config,
    results: Vec<IntegrationResult<DiscoveryReport>>,
) -> (IntegrationController, Arc<MemoryConfigStore>) {
    let store = Arc::new(MemoryConfigStore::with_config(config));
    let controller = IntegrationController::start(
        store.clone(),
        Arc::new(TracingSignals),
        Arc::new(ScriptedDiscovery::with_results(results)),
        HostContext::default(),
    )
    .await
    .expect("start failed");
    (controller, store)
}
