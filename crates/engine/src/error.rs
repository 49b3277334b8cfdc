// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the sync engine

use munch_core::{ChainError, StoreError, TxHash, WalletError};
use thiserror::Error;

/// Errors reported to callers of the sync controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("no wallet available: {0}")]
    WalletUnavailable(String),
    #[error("request rejected by user")]
    UserRejected,
    #[error("network error: {0}")]
    Network(String),
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),
    #[error("transaction {hash} failed: {reason}")]
    TransactionFailed { hash: TxHash, reason: String },
    #[error("not ready: {0}")]
    NotReady(String),
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl From<WalletError> for SyncError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Unavailable(msg) => SyncError::WalletUnavailable(msg),
            WalletError::UserRejected => SyncError::UserRejected,
            WalletError::Provider(msg) => SyncError::WalletUnavailable(msg),
        }
    }
}

impl From<ChainError> for SyncError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Network(msg) => SyncError::Network(msg),
            ChainError::UserRejected => SyncError::UserRejected,
            ChainError::SubmissionRejected(msg) => SyncError::SubmissionRejected(msg),
            // Undecodable ledger data is reported like any other failed read
            ChainError::Decode(msg) => SyncError::Network(msg),
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::ProtocolViolation(e.to_string())
    }
}
