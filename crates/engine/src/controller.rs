// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync controller: wallet session, bulk load, live subscription, submissions
//!
//! The controller owns the chain client, the wallet session and the entry
//! store for one application session. All methods take `&mut self`, so the
//! store has a single writer; the live subscription's channel is the only
//! hand-off between tasks.
//!
//! A submission never writes to the store. Its entry arrives through the live
//! subscription like anyone else's.

use crate::error::SyncError;
use crate::live::LiveSubscription;
use munch_core::{
    Address, ChainClient, Confirmation, ConnectionState, Entry, EntryStore, IdGen,
    PendingSubmission, SubmissionId, SubmissionOutcome, SubmissionPhase, UuidIdGen,
    WalletProvider, WalletSession,
};
use std::collections::HashMap;
use tokio::sync::watch;

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Bootstrapping,
    Live,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Idle => write!(f, "idle"),
            SyncState::Bootstrapping => write!(f, "bootstrapping"),
            SyncState::Live => write!(f, "live"),
        }
    }
}

/// A submission that is waiting for its terminal status
#[derive(Debug)]
struct InFlight {
    pending: PendingSubmission,
    total_before: Option<u64>,
}

/// Keeps the local entry cache in sync with the ledger
pub struct SyncController<C, W, I = UuidIdGen> {
    chain: C,
    session: WalletSession<W>,
    store: EntryStore,
    live: Option<LiveSubscription>,
    state: SyncState,
    ids: I,
    in_flight: HashMap<SubmissionId, InFlight>,
}

impl<C: ChainClient, W: WalletProvider> SyncController<C, W, UuidIdGen> {
    pub fn new(chain: C, wallet: W) -> Self {
        Self::with_ids(chain, wallet, UuidIdGen)
    }
}

impl<C, W, I> SyncController<C, W, I>
where
    C: ChainClient,
    W: WalletProvider,
    I: IdGen,
{
    /// Create a controller with a custom submission ID generator
    pub fn with_ids(chain: C, wallet: W, ids: I) -> Self {
        Self {
            chain,
            session: WalletSession::new(wallet),
            store: EntryStore::new(),
            live: None,
            state: SyncState::Idle,
            ids,
            in_flight: HashMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Connect interactively and bootstrap.
    ///
    /// An existing session is torn down first, so the cache is rebuilt from
    /// scratch.
    pub async fn connect(&mut self) -> Result<Address, SyncError> {
        if self.state != SyncState::Idle || self.session.state().is_connected() {
            self.disconnect();
        }
        let account = self.session.connect().await?;
        self.bootstrap().await?;
        Ok(account)
    }

    /// Reuse an earlier wallet authorization, bootstrapping if one exists
    pub async fn restore_if_authorized(&mut self) -> Result<Option<Address>, SyncError> {
        if self.state != SyncState::Idle {
            self.teardown();
        }
        let Some(account) = self.session.restore_if_authorized().await? else {
            return Ok(None);
        };
        self.bootstrap().await?;
        Ok(Some(account))
    }

    /// Load the ledger and go live.
    ///
    /// Requires a connected account. Any previous cache and subscription are
    /// discarded. On failure the controller is back in `Idle` with no
    /// subscription held.
    pub async fn bootstrap(&mut self) -> Result<usize, SyncError> {
        let Some(account) = self.session.current_account() else {
            return Err(SyncError::NotReady("wallet not connected".to_string()));
        };

        self.teardown();
        self.state = SyncState::Bootstrapping;
        tracing::info!(%account, "bootstrapping");

        match self.load().await {
            Ok(count) => {
                self.state = SyncState::Live;
                tracing::info!(entries = count, "live");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "bootstrap failed");
                self.teardown();
                Err(e)
            }
        }
    }

    async fn load(&mut self) -> Result<usize, SyncError> {
        // Subscribe first: whatever lands during the bulk read is buffered
        let live = LiveSubscription::register(&self.chain).await?;
        let live = self.live.insert(live);

        let entries = self.chain.fetch_all().await?;
        let seeded = self.store.seed(entries)?;
        tracing::debug!(seeded, "bulk read seeded");

        live.start(&mut self.store)?;
        Ok(self.store.len())
    }

    /// Drop the session: unsubscribe, clear the cache, forget the account
    pub fn disconnect(&mut self) {
        self.teardown();
        self.in_flight.clear();
        self.session.disconnect();
    }

    fn teardown(&mut self) {
        if let Some(live) = self.live.take() {
            live.stop(&self.chain);
        }
        if self.store.is_seeded() || !self.store.is_empty() {
            self.store.clear();
        }
        self.state = SyncState::Idle;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session.state()
    }

    pub fn current_account(&self) -> Option<Address> {
        self.session.current_account()
    }

    /// Snapshot of the cache.
    ///
    /// Entries delivered since the last `pump` or `next_live_entry` are not
    /// included yet.
    pub fn current_entries(&self) -> Vec<Entry> {
        self.store.all()
    }

    /// Revision channel that ticks whenever the cache changes
    pub fn watch_entries(&self) -> watch::Receiver<u64> {
        self.store.watch()
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    // -------------------------------------------------------------------------
    // Live path
    // -------------------------------------------------------------------------

    /// Merge every live entry delivered so far; returns the number inserted
    pub fn pump(&mut self) -> usize {
        match self.live.as_mut() {
            Some(live) => live.drain(&mut self.store),
            None => 0,
        }
    }

    /// Wait for the next live entry that is new to the cache.
    ///
    /// Returns `None` when not live or when the feed has closed.
    pub async fn next_live_entry(&mut self) -> Option<Entry> {
        match self.live.as_mut() {
            Some(live) => live.next_inserted(&mut self.store).await,
            None => None,
        }
    }

    // -------------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------------

    /// Submit an append and wait for it to be mined
    pub async fn submit(
        &mut self,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<SubmissionOutcome, SyncError> {
        let pending = self.begin_submit(what, place, why).await?;
        self.finish_submit(&pending).await
    }

    /// Send an append and return once it is in the pending pool.
    ///
    /// Fails with `NotReady`, without touching the network, unless the
    /// controller is live with a connected account.
    pub async fn begin_submit(
        &mut self,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<PendingSubmission, SyncError> {
        if self.state != SyncState::Live {
            return Err(SyncError::NotReady(format!(
                "controller is {}, not live",
                self.state
            )));
        }
        let Some(signer) = self.session.current_account() else {
            return Err(SyncError::NotReady("wallet not connected".to_string()));
        };

        let id = SubmissionId(self.ids.next());
        tracing::info!(submission = %id, phase = ?SubmissionPhase::Submitting, "submitting");

        let total_before = self.read_total().await;
        let handle = self
            .chain
            .send_append(&signer, what, place, why)
            .await
            .map_err(|e| {
                tracing::warn!(submission = %id, error = %e, "submission failed");
                SyncError::from(e)
            })?;

        let pending = PendingSubmission::new(id.clone(), &handle);
        tracing::info!(
            submission = %id,
            hash = %pending.hash,
            phase = ?pending.phase(),
            "transaction pending"
        );
        self.in_flight.insert(
            id,
            InFlight {
                pending: pending.clone(),
                total_before,
            },
        );
        Ok(pending)
    }

    /// Wait for the terminal status of a submission started with `begin_submit`
    pub async fn finish_submit(
        &mut self,
        pending: &PendingSubmission,
    ) -> Result<SubmissionOutcome, SyncError> {
        let confirmation = self.chain.await_confirmation(&pending.handle()).await;
        let tracked = self.in_flight.remove(&pending.id);
        let confirmation = confirmation?;

        let mut settled = pending.clone();
        settled.status = confirmation.clone().into();
        tracing::info!(
            submission = %settled.id,
            hash = %settled.hash,
            phase = ?settled.phase(),
            "submission settled"
        );

        match confirmation {
            Confirmation::Failed { reason } => Err(SyncError::TransactionFailed {
                hash: pending.hash,
                reason,
            }),
            Confirmation::Mined { block } => {
                let total_after = self.read_total().await;
                let total_before = tracked.and_then(|t| t.total_before);
                if let (Some(before), Some(after)) = (total_before, total_after) {
                    if !advanced_by_one(before, after) {
                        tracing::warn!(
                            before,
                            after,
                            "ledger total did not advance by exactly one"
                        );
                    }
                }
                Ok(SubmissionOutcome {
                    id: pending.id.clone(),
                    hash: pending.hash,
                    block,
                    ledger_total: total_after,
                })
            }
        }
    }

    /// Phase of a submission still awaiting its terminal status.
    ///
    /// Tracking starts once the transaction is in the pending pool, so this
    /// is `Confirming` or `None`.
    pub fn submission_phase(&self, id: &SubmissionId) -> Option<SubmissionPhase> {
        self.in_flight.get(id).map(|t| t.pending.phase())
    }

    /// Number of submissions awaiting their terminal status
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Diagnostic read of the ledger counter; failures are logged, not surfaced
    async fn read_total(&self) -> Option<u64> {
        match self.chain.fetch_total_count().await {
            Ok(total) => {
                tracing::debug!(total, "ledger total");
                Some(total)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read ledger total");
                None
            }
        }
    }
}

/// Whether the ledger counter moved from `before` to exactly `before + 1`
fn advanced_by_one(before: u64, after: u64) -> bool {
    before.checked_add(1) == Some(after)
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
