// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live subscription feeding the entry store
//!
//! The subscription is registered before the bulk read. Entries delivered
//! before the store is seeded wait in the channel and are replayed through
//! `merge` once `start` is called, so none are lost and none land ahead of
//! the bulk set.

use crate::error::SyncError;
use munch_core::{
    ChainClient, ChainError, Entry, EntryStore, MergeOutcome, SubscriptionHandle, SubscriptionId,
};
use tokio::sync::mpsc;

/// One live subscription and its delivery buffer
#[derive(Debug)]
pub struct LiveSubscription {
    handle: Option<SubscriptionHandle>,
    rx: mpsc::UnboundedReceiver<Entry>,
    started: bool,
}

impl LiveSubscription {
    /// Register with the chain client. Deliveries are buffered until `start`.
    pub async fn register<C: ChainClient>(chain: &C) -> Result<Self, ChainError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = chain.subscribe(tx).await?;
        tracing::debug!(subscription = %handle.id(), "live subscription registered");
        Ok(Self {
            handle: Some(handle),
            rx,
            started: false,
        })
    }

    pub fn id(&self) -> Option<&SubscriptionId> {
        self.handle.as_ref().map(SubscriptionHandle::id)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Begin merging into a seeded store, replaying everything buffered so far.
    ///
    /// Returns the number of replayed entries that were inserted.
    pub fn start(&mut self, store: &mut EntryStore) -> Result<usize, SyncError> {
        if !store.is_seeded() {
            return Err(SyncError::ProtocolViolation(
                "live entries cannot be merged before the bulk read is seeded".to_string(),
            ));
        }
        self.started = true;
        let inserted = self.drain(store);
        tracing::info!(inserted, "live subscription started");
        Ok(inserted)
    }

    /// Merge every entry delivered so far without waiting.
    ///
    /// A no-op until `start`; returns the number inserted.
    pub fn drain(&mut self, store: &mut EntryStore) -> usize {
        if !self.started {
            return 0;
        }
        let mut inserted = 0;
        while let Ok(entry) = self.rx.try_recv() {
            if merge(store, entry) == MergeOutcome::Inserted {
                inserted += 1;
            }
        }
        inserted
    }

    /// Wait for the next delivered entry that is new to the store.
    ///
    /// Duplicates are merged (and ignored) along the way. Returns `None` if
    /// the subscription has not started or its feed has closed.
    pub async fn next_inserted(&mut self, store: &mut EntryStore) -> Option<Entry> {
        if !self.started {
            return None;
        }
        while let Some(entry) = self.rx.recv().await {
            if merge(store, entry.clone()) == MergeOutcome::Inserted {
                return Some(entry);
            }
        }
        None
    }

    /// Unsubscribe; undelivered entries are discarded
    pub fn stop<C: ChainClient>(mut self, chain: &C) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(subscription = %handle.id(), "live subscription stopped");
            chain.unsubscribe(handle);
        }
        self.rx.close();
    }
}

fn merge(store: &mut EntryStore, entry: Entry) -> MergeOutcome {
    let (submitter, submitted_at) = (entry.submitter, entry.submitted_at);
    let outcome = store.merge(entry);
    match outcome {
        MergeOutcome::Inserted => {
            tracing::debug!(%submitter, submitted_at, "live entry inserted")
        }
        MergeOutcome::Duplicate => {
            tracing::debug!(%submitter, submitted_at, "duplicate live entry ignored")
        }
    }
    outcome
}

#[cfg(test)]
#[path = "live_tests.rs"]
mod tests;
