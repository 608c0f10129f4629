//! # Integration Core
//!
//! Configuration workflow for connecting an Azure DevOps organization, cloud-hosted or
//! self-managed, to the aggregation platform.
//!
//! ## Overview
//!
//! A session moves through these steps:
//! 1. The user chooses where the organization is hosted
//! 2. A credential arrives, either through the OAuth redirect (cloud) or the API key
//!    form (self-managed)
//! 3. The credential is validated and the visible projects are discovered as accounts
//! 4. The user selects the accounts to ingest, and the host is told whether
//!    installation can proceed
//!
//! ## Architecture
//!
//! - [`reduce`] is a pure transition function over [`SessionState`]; the current
//!   [`Screen`] is computed from the state
//! - [`IntegrationController`] applies one event at a time and performs the resulting
//!   effects through the host seams: [`config_manager::ConfigStore`] for persistence,
//!   [`HostSignals`] for the loading/install signals
//! - Discovery is a [`DiscoveryStrategy`]: [`RestDiscovery`] talks to the REST API,
//!   [`HostValidationDiscovery`] delegates to the host
//!
//! ## Error Handling
//!
//! Failures never abort the session. They are returned as [`IntegrationError`] and
//! recorded on the state so the current screen can show them.

pub mod aggregator;
pub use aggregator::{
    aggregate_accounts, install_enabled, merge_accounts, DiscoveryOptions, DiscoveryReport,
    DEFAULT_CONCURRENCY,
};

pub mod controller;
pub use controller::{HostSignals, IntegrationController, TracingSignals};

pub mod discovery;
pub use discovery::{DiscoveryStrategy, HostValidationDiscovery, HostValidator, RestDiscovery};

pub mod errors;
pub use errors::{IntegrationError, IntegrationResult, ProjectFailure};

pub mod state;
pub use state::{reduce, DiscoveryRun, Effect, Event, HostContext, Screen, SessionState, Transition};
