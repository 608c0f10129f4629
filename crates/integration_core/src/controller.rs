//! The integration controller.
//!
//! Owns the session state and applies one transition at a time, carrying out the
//! effects the reducer asks for: persisting through the [`ConfigStore`], signalling the
//! host, and running discovery through the configured [`DiscoveryStrategy`].

use azure_devops_client::ApiKeyAuth;
use chrono::Utc;
use config_manager::{Config, ConfigStore, IntegrationType};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::aggregator::DiscoveryReport;
use crate::discovery::DiscoveryStrategy;
use crate::state::{reduce, DiscoveryRun, Effect, Event, HostContext, Screen, SessionState, Transition};
use crate::IntegrationResult;

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

/// Signals the integration sends to its host.
pub trait HostSignals: Send + Sync {
    /// The integration is busy and the host should show a loading indicator.
    fn set_loading(&self, loading: bool);

    /// Whether the host may offer to install the integration.
    fn set_install_enabled(&self, enabled: bool);
}

/// Host signals written to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSignals;

impl HostSignals for TracingSignals {
    fn set_loading(&self, loading: bool) {
        debug!(loading = loading, "Host loading signal");
    }

    fn set_install_enabled(&self, enabled: bool) {
        info!(install_enabled = enabled, "Host install signal");
    }
}

/// Drives an integration session.
///
/// # Example
///
/// ```rust,no_run
/// use config_manager::{FileConfigStore, IntegrationType};
/// use integration_core::{HostContext, IntegrationController, RestDiscovery, TracingSignals};
/// use std::sync::Arc;
///
/// # async fn example() -> integration_core::IntegrationResult<()> {
/// let mut controller = IntegrationController::start(
///     Arc::new(FileConfigStore::new("azdo-connect.toml")),
///     Arc::new(TracingSignals),
///     Arc::new(RestDiscovery::new()),
///     HostContext::default(),
/// )
/// .await?;
///
/// controller.choose_location(IntegrationType::SelfManaged).await?;
/// println!("{}", controller.screen());
/// # Ok(())
/// # }
/// ```
pub struct IntegrationController {
    state: SessionState,
    store: Arc<dyn ConfigStore>,
    signals: Arc<dyn HostSignals>,
    strategy: Arc<dyn DiscoveryStrategy>,
}

impl IntegrationController {
    pub fn new(
        state: SessionState,
        store: Arc<dyn ConfigStore>,
        signals: Arc<dyn HostSignals>,
        strategy: Arc<dyn DiscoveryStrategy>,
    ) -> Self {
        Self {
            state,
            store,
            signals,
            strategy,
        }
    }

    /// Loads the stored configuration and rebuilds the session from it.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::Configuration` if the store cannot be read.
    #[instrument(skip(store, signals, strategy))]
    pub async fn start(
        store: Arc<dyn ConfigStore>,
        signals: Arc<dyn HostSignals>,
        strategy: Arc<dyn DiscoveryStrategy>,
        host: HostContext,
    ) -> IntegrationResult<Self> {
        signals.set_loading(true);
        let loaded = store.load().await;
        signals.set_loading(false);
        let config = loaded?;

        let controller = Self::new(SessionState::restore(config, host), store, signals, strategy);
        controller
            .signals
            .set_install_enabled(controller.state.install_enabled());

        info!(screen = %controller.screen(), "Integration session started");
        Ok(controller)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        self.state.config()
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    /// Applies an event and runs any discovery it starts to completion.
    pub async fn dispatch(&mut self, event: Event) -> IntegrationResult<()> {
        if let Some(run) = self.apply(event).await? {
            let result = self.run_discovery(&run).await;
            self.complete_discovery(run.id(), result).await?;
        }
        Ok(())
    }

    /// Applies an event without running discovery.
    ///
    /// A discovery run started by the event is returned so the caller can drive it
    /// with [`Self::run_discovery`] and [`Self::complete_discovery`].
    ///
    /// # Errors
    ///
    /// Returns the error the transition surfaced, or a store failure.
    pub async fn apply(&mut self, event: Event) -> IntegrationResult<Option<DiscoveryRun>> {
        let Transition {
            state,
            effects,
            error,
        } = reduce(&self.state, event);
        self.state = state;

        let mut started = None;
        for effect in effects {
            match effect {
                Effect::PersistConfig => self.store.save(self.state.config()).await?,
                Effect::SetInstallEnabled(enabled) => self.signals.set_install_enabled(enabled),
                Effect::StartDiscovery(run) => started = Some(run),
            }
        }

        match error {
            Some(e) => Err(e),
            None => Ok(started),
        }
    }

    /// Runs discovery for a ticket; the session state is not touched.
    ///
    /// The host shows its loading indicator for the duration of the run, whatever the
    /// outcome.
    #[instrument(skip(self, run), fields(run_id = run.id()))]
    pub async fn run_discovery(&self, run: &DiscoveryRun) -> IntegrationResult<DiscoveryReport> {
        self.signals.set_loading(true);
        let result = self.strategy.discover(run.auth(), self.state.config()).await;
        self.signals.set_loading(false);
        result
    }

    /// Reports the outcome of a discovery run back to the session.
    ///
    /// The outcome is dropped if the run is no longer the current one.
    pub async fn complete_discovery(
        &mut self,
        run_id: u64,
        result: IntegrationResult<DiscoveryReport>,
    ) -> IntegrationResult<()> {
        self.apply(Event::DiscoveryCompleted { run_id, result })
            .await
            .map(|_| ())
    }

    /// Starts discovery if a credential is stored but was never enumerated.
    pub async fn resume(&mut self) -> IntegrationResult<()> {
        if self.state.needs_discovery() {
            info!("Stored credential has no accounts yet, discovering");
            self.dispatch(Event::DiscoveryRequested).await?;
        }
        Ok(())
    }

    pub async fn set_loading(&mut self, loading: bool) -> IntegrationResult<()> {
        self.dispatch(Event::SetLoading(loading)).await
    }

    pub async fn choose_location(&mut self, integration_type: IntegrationType) -> IntegrationResult<()> {
        self.dispatch(Event::SetType(integration_type)).await
    }

    /// Handles the URL the session was opened with, stamping any credential with now.
    pub async fn handle_redirect(&mut self, url: &str) -> IntegrationResult<()> {
        self.dispatch(Event::RedirectReceived {
            url: url.to_string(),
            received_at: Utc::now(),
        })
        .await
    }

    pub async fn submit_credential(&mut self, key: ApiKeyAuth) -> IntegrationResult<()> {
        self.dispatch(Event::CredentialSubmitted(key)).await
    }

    pub async fn discover(&mut self) -> IntegrationResult<()> {
        self.dispatch(Event::DiscoveryRequested).await
    }

    pub async fn select_account(&mut self, id: &str, selected: bool) -> IntegrationResult<()> {
        self.dispatch(Event::AccountSelected {
            id: id.to_string(),
            selected,
        })
        .await
    }

    pub async fn select_all(&mut self, selected: bool) -> IntegrationResult<()> {
        self.dispatch(Event::AllAccountsSelected(selected)).await
    }

    pub async fn request_reauth(&mut self) -> IntegrationResult<()> {
        self.dispatch(Event::ReAuthRequested).await
    }
}
