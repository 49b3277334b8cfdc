// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake ledger for testing
//!
//! One in-memory ledger that plays both the contract and the host wallet.
//! Appends become entries when their confirmation is awaited; every entry
//! appended on the ledger is pushed to the live subscribers, like the
//! contract event would be.
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use munch_core::{
    Address, ChainClient, ChainError, Confirmation, Entry, EntrySink, LiveFeed, PendingHandle,
    SubscriptionHandle, SubscriptionId, TxHash, WalletError, WalletProvider,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// First timestamp the fake ledger assigns
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Recorded ledger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    RequestAccounts,
    AuthorizedAccounts,
    FetchAll,
    FetchTotalCount,
    SendAppend {
        signer: Address,
        what: String,
        place: String,
        why: String,
    },
    AwaitConfirmation {
        hash: TxHash,
    },
    Subscribe,
}

impl LedgerCall {
    /// Calls that reach the ledger contract rather than the wallet
    pub fn is_chain_call(&self) -> bool {
        !matches!(
            self,
            LedgerCall::RequestAccounts | LedgerCall::AuthorizedAccounts
        )
    }
}

#[derive(Debug, Clone)]
enum ConfirmScript {
    Mine,
    Fail(String),
}

#[derive(Debug, Clone)]
struct PendingAppend {
    signer: Address,
    what: String,
    place: String,
    why: String,
}

#[derive(Debug)]
struct LedgerState {
    entries: Vec<Entry>,
    calls: Vec<LedgerCall>,
    wallet_present: bool,
    accounts: Vec<Address>,
    authorized: bool,
    reject_prompts: bool,
    feeds: Vec<LiveFeed>,
    pending: HashMap<TxHash, PendingAppend>,
    next_tx: u64,
    next_time: u64,
    next_subscription: u64,
    confirm: ConfirmScript,
    redeliver: bool,
    send_error: Option<ChainError>,
    fetch_error: Option<ChainError>,
    subscribe_error: Option<ChainError>,
    during_fetch: Vec<(Entry, bool)>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            calls: Vec::new(),
            wallet_present: true,
            accounts: vec![FakeLedger::default_account()],
            authorized: false,
            reject_prompts: false,
            feeds: Vec::new(),
            pending: HashMap::new(),
            next_tx: 1,
            next_time: GENESIS_TIME,
            next_subscription: 1,
            confirm: ConfirmScript::Mine,
            redeliver: false,
            send_error: None,
            fetch_error: None,
            subscribe_error: None,
            during_fetch: Vec::new(),
        }
    }
}

impl LedgerState {
    fn notify(&mut self, entry: &Entry) {
        self.feeds.retain(|feed| feed.is_active());
        let copies = if self.redeliver { 2 } else { 1 };
        for feed in &self.feeds {
            for _ in 0..copies {
                feed.deliver(entry.clone());
            }
        }
    }
}

/// In-memory ledger and wallet for tests
#[derive(Clone, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account the fake wallet exposes unless told otherwise (`0x…0abc`)
    pub fn default_account() -> Address {
        let mut bytes = [0u8; 20];
        bytes[18] = 0x0a;
        bytes[19] = 0xbc;
        Address::new(bytes)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: LedgerCall) {
        self.lock().calls.push(call);
    }

    // -------------------------------------------------------------------------
    // Wallet scripting
    // -------------------------------------------------------------------------

    /// Pretend the user granted access earlier
    pub fn authorize(&self) {
        self.lock().authorized = true;
    }

    /// Pretend no wallet is installed
    pub fn remove_wallet(&self) {
        self.lock().wallet_present = false;
    }

    /// Decline every permission prompt
    pub fn reject_prompts(&self) {
        self.lock().reject_prompts = true;
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.lock().accounts = accounts;
    }

    // -------------------------------------------------------------------------
    // Ledger scripting
    // -------------------------------------------------------------------------

    /// Seed ledger history without notifying anyone
    pub fn with_history(self, entries: Vec<Entry>) -> Self {
        {
            let mut state = self.lock();
            if let Some(last) = entries.iter().map(|e| e.submitted_at).max() {
                state.next_time = state.next_time.max(last + 1);
            }
            state.entries.extend(entries);
        }
        self
    }

    /// Append an entry from some other client and notify subscribers
    pub fn append_external(&self, entry: Entry) {
        let mut state = self.lock();
        state.entries.push(entry.clone());
        state.notify(&entry);
    }

    /// Push a notification without touching the ledger (network redelivery)
    pub fn notify(&self, entry: Entry) {
        self.lock().notify(&entry);
    }

    /// Append `entry` while the next `fetch_all` is in flight: it misses the
    /// snapshot but reaches subscribers
    pub fn append_during_fetch(&self, entry: Entry) {
        self.lock().during_fetch.push((entry, true));
    }

    /// Redeliver `entry` while the next `fetch_all` is in flight; the
    /// snapshot already holds it if it is on the ledger
    pub fn notify_during_fetch(&self, entry: Entry) {
        self.lock().during_fetch.push((entry, false));
    }

    /// Deliver every notification twice
    pub fn redeliver_notifications(&self) {
        self.lock().redeliver = true;
    }

    /// Timestamp the next mined append receives
    pub fn set_next_time(&self, time: u64) {
        self.lock().next_time = time;
    }

    /// Make pending appends fail with `reason` when confirmed
    pub fn fail_confirmations(&self, reason: impl Into<String>) {
        self.lock().confirm = ConfirmScript::Fail(reason.into());
    }

    pub fn mine_confirmations(&self) {
        self.lock().confirm = ConfirmScript::Mine;
    }

    pub fn fail_next_send(&self, error: ChainError) {
        self.lock().send_error = Some(error);
    }

    pub fn fail_next_fetch(&self, error: ChainError) {
        self.lock().fetch_error = Some(error);
    }

    pub fn fail_next_subscribe(&self, error: ChainError) {
        self.lock().subscribe_error = Some(error);
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls that reached the contract
    pub fn chain_calls(&self) -> Vec<LedgerCall> {
        self.calls()
            .into_iter()
            .filter(LedgerCall::is_chain_call)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Entries on the ledger, in ledger order
    pub fn ledger(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Number of subscriptions still receiving notifications
    pub fn active_subscriptions(&self) -> usize {
        let mut state = self.lock();
        state.feeds.retain(|feed| feed.is_active());
        state.feeds.len()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }
}

#[async_trait]
impl WalletProvider for FakeLedger {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.record(LedgerCall::RequestAccounts);
        let mut state = self.lock();
        if !state.wallet_present {
            return Err(WalletError::Unavailable(
                "no wallet in host environment".to_string(),
            ));
        }
        if state.reject_prompts {
            return Err(WalletError::UserRejected);
        }
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    async fn authorized_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.record(LedgerCall::AuthorizedAccounts);
        let state = self.lock();
        if !state.wallet_present {
            return Err(WalletError::Unavailable(
                "no wallet in host environment".to_string(),
            ));
        }
        if state.authorized {
            Ok(state.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl ChainClient for FakeLedger {
    async fn fetch_all(&self) -> Result<Vec<Entry>, ChainError> {
        self.record(LedgerCall::FetchAll);
        let mut state = self.lock();
        if let Some(error) = state.fetch_error.take() {
            return Err(error);
        }

        let snapshot = state.entries.clone();
        let racing = std::mem::take(&mut state.during_fetch);
        for (entry, append) in racing {
            if append {
                state.entries.push(entry.clone());
            }
            state.notify(&entry);
        }
        Ok(snapshot)
    }

    async fn fetch_total_count(&self) -> Result<u64, ChainError> {
        self.record(LedgerCall::FetchTotalCount);
        Ok(self.lock().entries.len() as u64)
    }

    async fn send_append(
        &self,
        signer: &Address,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<PendingHandle, ChainError> {
        self.record(LedgerCall::SendAppend {
            signer: *signer,
            what: what.to_string(),
            place: place.to_string(),
            why: why.to_string(),
        });

        let mut state = self.lock();
        if let Some(error) = state.send_error.take() {
            return Err(error);
        }

        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&state.next_tx.to_be_bytes());
        state.next_tx += 1;
        let hash = TxHash::new(bytes);

        state.pending.insert(
            hash,
            PendingAppend {
                signer: *signer,
                what: what.to_string(),
                place: place.to_string(),
                why: why.to_string(),
            },
        );
        Ok(PendingHandle { hash })
    }

    async fn await_confirmation(&self, handle: &PendingHandle) -> Result<Confirmation, ChainError> {
        self.record(LedgerCall::AwaitConfirmation { hash: handle.hash });

        let mut state = self.lock();
        let Some(pending) = state.pending.remove(&handle.hash) else {
            return Err(ChainError::Network(format!(
                "unknown transaction {}",
                handle.hash
            )));
        };

        match state.confirm.clone() {
            ConfirmScript::Fail(reason) => Ok(Confirmation::Failed { reason }),
            ConfirmScript::Mine => {
                let entry = Entry::new(
                    pending.signer,
                    state.next_time,
                    pending.what,
                    pending.place,
                    pending.why,
                );
                state.next_time += 1;
                state.entries.push(entry.clone());
                state.notify(&entry);
                Ok(Confirmation::Mined {
                    block: Some(state.entries.len() as u64),
                })
            }
        }
    }

    async fn subscribe(&self, sink: EntrySink) -> Result<SubscriptionHandle, ChainError> {
        self.record(LedgerCall::Subscribe);

        let mut state = self.lock();
        if let Some(error) = state.subscribe_error.take() {
            return Err(error);
        }

        let id = SubscriptionId(format!("fake-{}", state.next_subscription));
        state.next_subscription += 1;
        let (handle, feed) = SubscriptionHandle::open(id, sink);
        state.feeds.push(feed);
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
