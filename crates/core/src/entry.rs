// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger entries
//!
//! An entry is one recorded meal. The ledger assigns no sequence number, so
//! the full `(submitter, submitted_at, what, place, why)` tuple is the
//! identity of an entry: derived `Eq`/`Hash` compare every field.

use crate::address::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One meal statement recorded on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Signer that appended the entry
    pub submitter: Address,
    /// Ledger timestamp in Unix seconds
    pub submitted_at: u64,
    pub what: String,
    #[serde(rename = "where")]
    pub place: String,
    pub why: String,
}

impl Entry {
    pub fn new(
        submitter: Address,
        submitted_at: u64,
        what: impl Into<String>,
        place: impl Into<String>,
        why: impl Into<String>,
    ) -> Self {
        Self {
            submitter,
            submitted_at,
            what: what.into(),
            place: place.into(),
            why: why.into(),
        }
    }

    /// Ledger timestamp as a UTC instant, if representable
    pub fn submitted_at_utc(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.submitted_at).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
