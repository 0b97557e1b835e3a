//! Push-then-pull reconciliation engine
//!
//! Executed once at startup when the capability probe puts the process in
//! remote mode. Push sends every local account's balance to the authority as
//! a full overwrite; pull then materializes remote records locally, creating
//! unknown accounts with the password sentinel and updating divergent
//! balances while preserving local passwords. Local-only accounts are never
//! deleted by pull; deletion sync happens eagerly per business operation.
//!
//! Both loops are best-effort: a failure on one record is logged and counted,
//! never halting the rest.

use tracing::{info, warn};

use crate::error::CardBankResult;
use crate::models::{Account, AccountId, PASSWORD_SENTINEL};
use crate::remote::RemoteClient;
use crate::storage::LocalStore;

/// How the process talks (or doesn't) to the remote authority
///
/// Decided once per process by the capability probe; no mode transitions
/// occur mid-session. Per-call remote failures downgrade that single
/// operation to local-only, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// No reachable remote authority; all operations are local-only
    Local,
    /// Remote authority reachable; mutations are mirrored best-effort
    Remote,
}

impl RunMode {
    /// Probe the remote authority once and pick the mode for this process
    pub fn probe(remote: &dyn RemoteClient) -> Self {
        if remote.check() {
            info!("remote authority reachable, running in remote mode");
            RunMode::Remote
        } else {
            info!("remote authority unreachable, running in local mode");
            RunMode::Local
        }
    }
}

/// Counters from one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Local accounts pushed to the authority
    pub pushed: usize,
    /// Local accounts that failed to push
    pub push_failed: usize,
    /// Remote accounts materialized locally with the password sentinel
    pub created: usize,
    /// Local balances overwritten with the remote value
    pub updated: usize,
    /// Remote records already matching local state (no write)
    pub unchanged: usize,
    /// Remote records that could not be applied locally
    pub pull_failed: usize,
}

impl SyncReport {
    /// Number of local writes the pull side performed
    pub fn pull_writes(&self) -> usize {
        self.created + self.updated
    }

    fn absorb(&mut self, other: SyncReport) {
        self.pushed += other.pushed;
        self.push_failed += other.push_failed;
        self.created += other.created;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.pull_failed += other.pull_failed;
    }
}

/// Orchestrates push-then-pull reconciliation
pub struct SyncEngine<'a> {
    store: &'a mut LocalStore,
    remote: &'a dyn RemoteClient,
    max_pull_batch: usize,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine over the local store and a remote client
    pub fn new(
        store: &'a mut LocalStore,
        remote: &'a dyn RemoteClient,
        max_pull_batch: usize,
    ) -> Self {
        Self {
            store,
            remote,
            max_pull_batch,
        }
    }

    /// Push all local accounts, then pull the remote set
    ///
    /// A remote failure during pull is soft: push results are kept and
    /// startup continues. Local store errors still propagate.
    pub fn reconcile(&mut self) -> CardBankResult<SyncReport> {
        let mut report = self.push()?;
        match self.pull() {
            Ok(pull_report) => report.absorb(pull_report),
            Err(e) if e.is_remote() => {
                warn!(error = %e, "pull skipped after remote failure");
            }
            Err(e) => return Err(e),
        }
        info!(
            pushed = report.pushed,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.push_failed + report.pull_failed,
            "reconciliation finished"
        );
        Ok(report)
    }

    /// Push every local account's balance to the authority (full overwrite)
    pub fn push(&mut self) -> CardBankResult<SyncReport> {
        let mut report = SyncReport::default();
        let ids = self.store.ids()?;
        info!(count = ids.len(), "pushing local accounts");

        for id in ids {
            let account = match self.store.get(&id) {
                Ok(account) => account,
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping unreadable account during push");
                    report.push_failed += 1;
                    continue;
                }
            };
            match self.remote.sync_account(&account) {
                Ok(()) => report.pushed += 1,
                Err(e) => {
                    warn!(id = %id, error = %e, "push failed");
                    report.push_failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// Pull the authority's account set and apply it locally
    ///
    /// Running pull twice against an unchanged remote dataset performs zero
    /// writes on the second run.
    pub fn pull(&mut self) -> CardBankResult<SyncReport> {
        let mut report = SyncReport::default();
        let records = self.remote.fetch_all(self.max_pull_batch)?;
        info!(count = records.len(), "applying remote accounts");

        for record in records {
            let id = match AccountId::parse(&record.uuid) {
                Ok(id) => id,
                Err(e) => {
                    warn!(uuid = %record.uuid, error = %e, "remote record has invalid identifier");
                    report.pull_failed += 1;
                    continue;
                }
            };

            let local = match self.store.get(&id) {
                Ok(local) => Some(local),
                Err(e) if e.is_not_found() => None,
                Err(e) => {
                    warn!(id = %id, error = %e, "cannot read local account during pull");
                    report.pull_failed += 1;
                    continue;
                }
            };

            match local {
                Some(local) if local.balance == record.balance => {
                    report.unchanged += 1;
                }
                Some(local) => {
                    // Remote balance wins; the local password is preserved.
                    let updated = Account::from_parts(id, local.password, record.balance);
                    match self.store.put(&updated) {
                        Ok(()) => report.updated += 1,
                        Err(e) => {
                            warn!(id = %id, error = %e, "failed to update pulled account");
                            report.pull_failed += 1;
                        }
                    }
                }
                None => {
                    let created = Account::from_parts(id, PASSWORD_SENTINEL, record.balance);
                    match self.store.put(&created) {
                        Ok(()) => report.created += 1,
                        Err(e) => {
                            warn!(id = %id, error = %e, "failed to create pulled account");
                            report.pull_failed += 1;
                        }
                    }
                }
            }
        }
        Ok(report)
    }
}
