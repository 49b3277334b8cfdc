// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry store: the local cache of ledger entries
//!
//! The store is an ordered sequence with a set constraint laid over it.
//! Order is arrival order at the client: the bulk read first (ledger order),
//! then live entries in the order they were delivered.
//!
//! Two mutation paths exist:
//! - `seed` loads the bulk read. It may run once, before any `merge`.
//! - `merge` inserts a single entry and ignores exact duplicates, which
//!   absorbs both redelivered notifications and live events that overlap the
//!   bulk read.

use crate::entry::Entry;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::watch;

/// Result of merging a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Duplicate,
}

/// Contract violations when driving the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entry store already seeded")]
    AlreadySeeded,
    #[error("entry store cannot be seeded after {merged} merge(s)")]
    SeedAfterMerge { merged: usize },
}

/// In-memory cache of ledger entries
#[derive(Debug)]
pub struct EntryStore {
    entries: Vec<Entry>,
    index: HashSet<Entry>,
    seeded: bool,
    merged: usize,
    revision: watch::Sender<u64>,
}

impl EntryStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Vec::new(),
            index: HashSet::new(),
            seeded: false,
            merged: 0,
            revision,
        }
    }

    /// Load the bulk read. Duplicates within `entries` keep their first position.
    pub fn seed(&mut self, entries: Vec<Entry>) -> Result<usize, StoreError> {
        if self.seeded {
            return Err(StoreError::AlreadySeeded);
        }
        if self.merged > 0 {
            return Err(StoreError::SeedAfterMerge {
                merged: self.merged,
            });
        }

        self.seeded = true;
        for entry in entries {
            if self.index.insert(entry.clone()) {
                self.entries.push(entry);
            }
        }
        self.bump();
        Ok(self.entries.len())
    }

    /// Insert one entry unless an identical one is already present
    pub fn merge(&mut self, entry: Entry) -> MergeOutcome {
        self.merged += 1;
        if self.index.contains(&entry) {
            return MergeOutcome::Duplicate;
        }
        self.index.insert(entry.clone());
        self.entries.push(entry);
        self.bump();
        MergeOutcome::Inserted
    }

    /// Drop every entry and return to the unseeded state.
    ///
    /// Used when a session is torn down; watchers stay attached.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.seeded = false;
        self.merged = 0;
        self.bump();
    }

    /// Snapshot of all entries in arrival order
    pub fn all(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn contains(&self, entry: &Entry) -> bool {
        self.index.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Count of visible changes (seed and each insert)
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that is notified whenever the contents change
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
