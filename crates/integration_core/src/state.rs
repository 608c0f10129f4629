//! Session state and the transition reducer.
//!
//! [`reduce`] is a pure function: given the current [`SessionState`] and an [`Event`]
//! it returns the next state plus the [`Effect`]s the controller has to carry out.
//! The screen shown to the user is derived from the state, never stored.

use auth_handler::parse_redirect;
use azure_devops_client::{ApiKeyAuth, Auth};
use chrono::{DateTime, Utc};
use config_manager::{Config, IntegrationType};
use std::fmt;
use tracing::{debug, info, warn};

use crate::aggregator::{install_enabled, merge_accounts, DiscoveryReport};
use crate::{IntegrationError, IntegrationResult};

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    ChoosingLocation,
    AwaitingCloudAuth,
    AwaitingSelfManagedAuth,
    Validating,
    BrowsingAccounts,
    ReAuthCloud,
    ReAuthSelfManaged,
    Loading,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::ChoosingLocation => "choosing-location",
            Screen::AwaitingCloudAuth => "awaiting-cloud-auth",
            Screen::AwaitingSelfManagedAuth => "awaiting-self-managed-auth",
            Screen::Validating => "validating",
            Screen::BrowsingAccounts => "browsing-accounts",
            Screen::ReAuthCloud => "re-auth-cloud",
            Screen::ReAuthSelfManaged => "re-auth-self-managed",
            Screen::Loading => "loading",
        };
        write!(f, "{}", name)
    }
}

/// Facts about the session supplied by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostContext {
    /// The integration was installed before this session
    pub installed: bool,
    /// The host opened the session to replace the credential
    pub reauth: bool,
}

/// Ticket for a single discovery run.
///
/// A result is only applied if it comes back with the ticket of the run in flight and
/// the configured credential is still the one the run was started with.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryRun {
    id: u64,
    auth: Auth,
    previous_auth: Option<Auth>,
    rollback_on_failure: bool,
}

impl DiscoveryRun {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum DiscoveryPhase {
    #[default]
    Idle,
    Running(DiscoveryRun),
}

/// Everything the integration knows during a session.
///
/// The persisted [`Config`] plus transient flags that are rebuilt on every start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    config: Config,
    installed: bool,
    reauth: bool,
    loading: bool,
    discovered: bool,
    discovery: DiscoveryPhase,
    next_run_id: u64,
    consumed_redirect: Option<String>,
    error: Option<IntegrationError>,
    warning: Option<IntegrationError>,
}

impl SessionState {
    /// Rebuilds the session from a persisted configuration.
    ///
    /// A configuration that already holds accounts counts as discovered.
    pub fn restore(config: Config, host: HostContext) -> Self {
        Self {
            discovered: !config.accounts.is_empty(),
            config,
            installed: host.installed,
            reauth: host.reauth,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn installed(&self) -> bool {
        self.installed
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_reauth(&self) -> bool {
        self.reauth
    }

    pub fn running_discovery(&self) -> Option<&DiscoveryRun> {
        match &self.discovery {
            DiscoveryPhase::Running(run) => Some(run),
            DiscoveryPhase::Idle => None,
        }
    }

    pub fn is_discovering(&self) -> bool {
        self.running_discovery().is_some()
    }

    /// The error currently shown to the user.
    pub fn error(&self) -> Option<&IntegrationError> {
        self.error.as_ref()
    }

    /// Non-blocking problem from the last discovery, such as skipped projects.
    pub fn warning(&self) -> Option<&IntegrationError> {
        self.warning.as_ref()
    }

    pub fn install_enabled(&self) -> bool {
        install_enabled(&self.config.accounts, self.installed)
    }

    /// Whether a credential is stored but its accounts were never discovered.
    pub fn needs_discovery(&self) -> bool {
        self.config.has_auth()
            && !self.discovered
            && !self.reauth
            && !self.is_discovering()
            && self.error.is_none()
    }

    pub fn screen(&self) -> Screen {
        if self.loading {
            return Screen::Loading;
        }

        let integration_type = match self.config.integration_type {
            None => return Screen::ChoosingLocation,
            Some(integration_type) => integration_type,
        };

        if self.is_discovering() {
            return Screen::Validating;
        }

        if self.reauth {
            return match integration_type {
                IntegrationType::Cloud => Screen::ReAuthCloud,
                IntegrationType::SelfManaged => Screen::ReAuthSelfManaged,
            };
        }

        if !self.config.has_auth() {
            return match integration_type {
                IntegrationType::Cloud => Screen::AwaitingCloudAuth,
                IntegrationType::SelfManaged => Screen::AwaitingSelfManagedAuth,
            };
        }

        if self.discovered {
            Screen::BrowsingAccounts
        } else {
            Screen::Validating
        }
    }

    fn start_discovery(
        &mut self,
        auth: Auth,
        previous_auth: Option<Auth>,
        rollback_on_failure: bool,
    ) -> DiscoveryRun {
        if let Some(stale) = self.running_discovery() {
            info!(
                stale_run = stale.id,
                "Credential changed, result of the running discovery will be discarded"
            );
        }

        self.next_run_id += 1;
        let run = DiscoveryRun {
            id: self.next_run_id,
            auth,
            previous_auth,
            rollback_on_failure,
        };
        self.discovery = DiscoveryPhase::Running(run.clone());
        self.error = None;
        self.warning = None;
        run
    }

    fn account_effects(&self) -> Vec<Effect> {
        vec![
            Effect::PersistConfig,
            Effect::SetInstallEnabled(self.install_enabled()),
        ]
    }
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The host started or finished a long-running operation
    SetLoading(bool),
    /// The user picked where the organization is hosted
    SetType(IntegrationType),
    /// The session was opened with this URL, possibly an OAuth redirect
    RedirectReceived {
        url: String,
        received_at: DateTime<Utc>,
    },
    /// The API key form was submitted
    CredentialSubmitted(ApiKeyAuth),
    /// Discovery for the stored credential was requested
    DiscoveryRequested,
    /// A discovery run finished
    DiscoveryCompleted {
        run_id: u64,
        result: IntegrationResult<DiscoveryReport>,
    },
    AccountSelected {
        id: String,
        selected: bool,
    },
    AllAccountsSelected(bool),
    /// The host asked for the credential to be replaced
    ReAuthRequested,
}

/// Work the controller performs after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the new configuration to the host
    PersistConfig,
    SetInstallEnabled(bool),
    /// Run discovery for the ticket and report back with [`Event::DiscoveryCompleted`]
    StartDiscovery(DiscoveryRun),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
    /// Error to surface to whoever triggered the event
    pub error: Option<IntegrationError>,
}

impl Transition {
    fn to(state: SessionState, effects: Vec<Effect>) -> Self {
        Self {
            state,
            effects,
            error: None,
        }
    }

    fn unchanged(state: &SessionState) -> Self {
        Self::to(state.clone(), Vec::new())
    }

    /// The event is refused and the state stays as it was.
    fn rejected(state: &SessionState, error: IntegrationError) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
            error: Some(error),
        }
    }

    /// The event was applied but ends in an error shown to the user.
    fn failed(mut state: SessionState, effects: Vec<Effect>, error: IntegrationError) -> Self {
        state.error = Some(error.clone());
        Self {
            state,
            effects,
            error: Some(error),
        }
    }
}

/// Applies an event to a state.
pub fn reduce(state: &SessionState, event: Event) -> Transition {
    match event {
        Event::SetLoading(loading) => {
            let mut next = state.clone();
            next.loading = loading;
            Transition::to(next, Vec::new())
        }
        Event::SetType(integration_type) => set_type(state, integration_type),
        Event::RedirectReceived { url, received_at } => redirect_received(state, url, received_at),
        Event::CredentialSubmitted(key) => credential_submitted(state, key),
        Event::DiscoveryRequested => discovery_requested(state),
        Event::DiscoveryCompleted { run_id, result } => discovery_completed(state, run_id, result),
        Event::AccountSelected { id, selected } => account_selected(state, id, selected),
        Event::AllAccountsSelected(selected) => {
            let mut next = state.clone();
            for account in next.config.accounts.values_mut() {
                account.selected = selected;
            }
            next.error = None;
            let effects = next.account_effects();
            Transition::to(next, effects)
        }
        Event::ReAuthRequested => {
            let mut next = state.clone();
            next.reauth = true;
            next.error = None;
            Transition::to(next, Vec::new())
        }
    }
}

fn set_type(state: &SessionState, integration_type: IntegrationType) -> Transition {
    if state.config.integration_type == Some(integration_type) {
        return Transition::unchanged(state);
    }
    if state.is_discovering() {
        return Transition::rejected(
            state,
            IntegrationError::invalid_transition("a discovery run is in progress"),
        );
    }
    if state.config.has_auth() {
        return Transition::rejected(
            state,
            IntegrationError::invalid_transition(
                "the location cannot change once a credential is configured",
            ),
        );
    }

    let mut next = state.clone();
    next.config = next.config.with_integration_type(integration_type);
    next.error = None;
    Transition::to(next, vec![Effect::PersistConfig])
}

fn redirect_received(state: &SessionState, url: String, received_at: DateTime<Utc>) -> Transition {
    if state.consumed_redirect.as_deref() == Some(url.as_str()) {
        debug!("Redirect already consumed");
        return Transition::unchanged(state);
    }

    match parse_redirect(&url, received_at) {
        Ok(None) => Transition::unchanged(state),
        Ok(Some(oauth)) => {
            let mut next = state.clone();
            next.consumed_redirect = Some(url);

            // A restored session sees the same redirect again; the stored grant wins.
            if let Some(stored) = &next.config.oauth2_auth {
                if stored.same_grant(&oauth) {
                    debug!("Redirect carries the stored credential, ignoring");
                    return Transition::to(next, Vec::new());
                }
            }

            let previous_auth = next.config.auth();
            let auth = Auth::OAuth2(oauth);
            next.config = next
                .config
                .with_integration_type(IntegrationType::Cloud)
                .with_auth(auth.clone());

            let rollback = next.reauth;
            let run = next.start_discovery(auth, previous_auth, rollback);
            info!(run_id = run.id, "OAuth credential received");
            Transition::to(next, vec![Effect::PersistConfig, Effect::StartDiscovery(run)])
        }
        Err(e) => {
            warn!(error = %e, "Ignoring malformed OAuth redirect");
            let mut next = state.clone();
            next.consumed_redirect = Some(url);
            Transition::failed(next, Vec::new(), e.into())
        }
    }
}

fn credential_submitted(state: &SessionState, key: ApiKeyAuth) -> Transition {
    if key.apikey.trim().is_empty() || key.url.trim().is_empty() {
        return Transition::rejected(
            state,
            IntegrationError::invalid_transition("both an API key and a URL are required"),
        );
    }

    let mut next = state.clone();
    let integration_type = next
        .config
        .integration_type
        .unwrap_or(IntegrationType::SelfManaged);
    let previous_auth = next.config.auth();
    let auth = Auth::ApiKey(key);
    next.config = next
        .config
        .with_integration_type(integration_type)
        .with_auth(auth.clone());

    let run = next.start_discovery(auth, previous_auth, true);
    info!(run_id = run.id, "API key submitted");
    Transition::to(next, vec![Effect::PersistConfig, Effect::StartDiscovery(run)])
}

fn discovery_requested(state: &SessionState) -> Transition {
    if let Some(run) = state.running_discovery() {
        debug!(run_id = run.id, "Discovery already in flight");
        return Transition::unchanged(state);
    }

    let Some(auth) = state.config.auth() else {
        return Transition::rejected(
            state,
            IntegrationError::invalid_transition("no credential is configured"),
        );
    };

    let mut next = state.clone();
    let run = next.start_discovery(auth.clone(), Some(auth), false);
    Transition::to(next, vec![Effect::StartDiscovery(run)])
}

fn discovery_completed(
    state: &SessionState,
    run_id: u64,
    result: IntegrationResult<DiscoveryReport>,
) -> Transition {
    let run = match state.running_discovery() {
        Some(run) if run.id == run_id && state.config.auth().as_ref() == Some(&run.auth) => {
            run.clone()
        }
        _ => {
            info!(run_id = run_id, "Discarding stale discovery result");
            return Transition::unchanged(state);
        }
    };

    let mut next = state.clone();
    next.discovery = DiscoveryPhase::Idle;

    match result {
        Ok(report) => {
            let accounts = merge_accounts(&next.config.accounts, report.accounts.clone(), next.installed);
            next.config = next.config.with_accounts(accounts);
            next.discovered = true;
            next.reauth = false;
            next.error = None;
            next.warning = report.partial_failure();

            info!(
                run_id = run_id,
                account_count = next.config.accounts.len(),
                skipped_count = report.failures.len(),
                "Discovery applied"
            );
            let effects = next.account_effects();
            Transition::to(next, effects)
        }
        Err(e) => {
            warn!(run_id = run_id, error = %e, "Discovery failed");
            let mut effects = Vec::new();
            if run.rollback_on_failure {
                next.config = next.config.with_optional_auth(run.previous_auth);
                effects.push(Effect::PersistConfig);
            }
            Transition::failed(next, effects, e)
        }
    }
}

fn account_selected(state: &SessionState, id: String, selected: bool) -> Transition {
    if !state.config.accounts.contains_key(&id) {
        return Transition::rejected(state, IntegrationError::UnknownAccount { id });
    }

    let mut next = state.clone();
    if let Some(account) = next.config.accounts.get_mut(&id) {
        account.selected = selected;
    }
    next.error = None;
    let effects = next.account_effects();
    Transition::to(next, effects)
}
