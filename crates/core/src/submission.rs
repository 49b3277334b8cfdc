// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission lifecycle
//!
//! A submission is the caller's view of one append transaction. It lives only
//! until its terminal status is observed and never touches the entry store:
//! the resulting entry reaches the cache through the live subscription.

use crate::adapters::{Confirmation, PendingHandle};
use crate::address::TxHash;
use serde::{Deserialize, Serialize};

/// Identifier for one `submit` call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network-reported status of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Accepted into the pending pool
    Submitted,
    Mined { block: Option<u64> },
    Failed { reason: String },
}

impl SubmissionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Submitted)
    }
}

impl From<Confirmation> for SubmissionStatus {
    fn from(confirmation: Confirmation) -> Self {
        match confirmation {
            Confirmation::Mined { block } => SubmissionStatus::Mined { block },
            Confirmation::Failed { reason } => SubmissionStatus::Failed { reason },
        }
    }
}

/// Where a submission is in its local lifecycle
///
/// Only `Confirming` is ever reported for a tracked submission. `Submitting`
/// covers the signature request inside `begin_submit`, before any id is
/// handed out, and appears in logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Submitting,
    Confirming,
    Done,
    Failed,
}

/// A submission accepted into the pending pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub hash: TxHash,
    pub status: SubmissionStatus,
}

impl PendingSubmission {
    pub fn new(id: SubmissionId, handle: &PendingHandle) -> Self {
        Self {
            id,
            hash: handle.hash,
            status: SubmissionStatus::Submitted,
        }
    }

    pub fn handle(&self) -> PendingHandle {
        PendingHandle { hash: self.hash }
    }

    /// Local phase implied by the network status
    pub fn phase(&self) -> SubmissionPhase {
        match self.status {
            SubmissionStatus::Submitted => SubmissionPhase::Confirming,
            SubmissionStatus::Mined { .. } => SubmissionPhase::Done,
            SubmissionStatus::Failed { .. } => SubmissionPhase::Failed,
        }
    }
}

/// Terminal result of a mined submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub id: SubmissionId,
    pub hash: TxHash,
    pub block: Option<u64>,
    /// Ledger total read after mining; diagnostic only
    pub ledger_total: Option<u64>,
}
