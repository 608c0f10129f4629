//! Account aggregation.
//!
//! Turns the projects visible to a credential into [`Account`] values and reconciles
//! them with the accounts already stored in the configuration.

use azure_devops_client::{Auth, DiscoveryClient, Project};
use config_manager::Account;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::{IntegrationError, ProjectFailure};

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

/// Default number of repository listings in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Tuning for a discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Upper bound on concurrent repository listings; zero is treated as one
    pub concurrency: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl DiscoveryOptions {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self { concurrency }
    }
}

/// Outcome of a discovery run that got past credential validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryReport {
    /// One unselected account per project that could be enumerated, in project order
    pub accounts: Vec<Account>,
    /// Projects that were skipped
    pub failures: Vec<ProjectFailure>,
}

impl DiscoveryReport {
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The skipped projects as an error value, if any were skipped.
    pub fn partial_failure(&self) -> Option<IntegrationError> {
        if self.is_complete() {
            None
        } else {
            Some(IntegrationError::PartialDiscoveryFailure {
                failed_projects: self.failures.clone(),
            })
        }
    }
}

/// Fetches the repository count of every project and builds the account list.
///
/// Listings run concurrently, bounded by `options.concurrency`, and the function waits
/// for all of them before returning. A project whose listing fails is logged and left
/// out; the others are still returned.
#[instrument(skip(client, auth, projects), fields(project_count = projects.len()))]
pub async fn aggregate_accounts<C>(
    client: &C,
    auth: &Auth,
    projects: Vec<Project>,
    options: DiscoveryOptions,
) -> DiscoveryReport
where
    C: DiscoveryClient + ?Sized,
{
    let mut outcomes: Vec<_> = stream::iter(projects.into_iter().enumerate())
        .map(move |(index, project)| async move {
            let result = client.list_repositories(&project.id, auth).await;
            (index, project, result)
        })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut report = DiscoveryReport::default();
    for (_, project, result) in outcomes {
        match result {
            Ok(repositories) => {
                debug!(
                    project_id = %project.id,
                    repository_count = repositories.len(),
                    "Enumerated project repositories"
                );
                report
                    .accounts
                    .push(Account::from_project(&project, repositories.len()));
            }
            Err(e) => {
                warn!(
                    project_id = %project.id,
                    project_name = %project.name,
                    error = %e,
                    "Skipping project, repositories could not be listed"
                );
                report
                    .failures
                    .push(ProjectFailure::new(&project.id, &project.name, &e));
            }
        }
    }

    info!(
        account_count = report.accounts.len(),
        skipped_count = report.failures.len(),
        "Account aggregation finished"
    );
    report
}

/// Reconciles freshly discovered accounts with the stored ones.
///
/// Entries are only updated or added, never duplicated or removed. An account that
/// already exists keeps its `selected` flag; a new one starts selected only when the
/// integration is already installed.
pub fn merge_accounts(
    existing: &BTreeMap<String, Account>,
    discovered: Vec<Account>,
    installed: bool,
) -> BTreeMap<String, Account> {
    let mut merged = existing.clone();
    for account in discovered {
        let selected = existing
            .get(&account.id)
            .map(|previous| previous.selected)
            .unwrap_or(installed);
        merged.insert(account.id.clone(), account.with_selected(selected));
    }
    merged
}

/// Whether the host may offer installation.
///
/// True when any account is selected, or, for an installed integration, when there is
/// at least one account.
pub fn install_enabled(accounts: &BTreeMap<String, Account>, installed: bool) -> bool {
    accounts.values().any(|a| a.selected) || (installed && !accounts.is_empty())
}
