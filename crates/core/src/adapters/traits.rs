// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for external integrations

use crate::address::{Address, TxHash};
use crate::entry::Entry;
use crate::subscription::{EntrySink, SubscriptionHandle};
use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// Wallet Provider
// =============================================================================

/// Errors from the host wallet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("no wallet available: {0}")]
    Unavailable(String),
    #[error("request rejected by user")]
    UserRejected,
    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// Host-provided wallet that owns the signing accounts
#[async_trait]
pub trait WalletProvider: Clone + Send + Sync + 'static {
    /// Ask the user for account access (may prompt)
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Accounts already authorized for this application (never prompts)
    async fn authorized_accounts(&self) -> Result<Vec<Address>, WalletError>;
}

// =============================================================================
// Chain Client
// =============================================================================

/// Errors from ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("network error: {0}")]
    Network(String),
    #[error("signature request rejected by user")]
    UserRejected,
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),
    #[error("malformed ledger data: {0}")]
    Decode(String),
}

/// Handle to a transaction accepted into the pending pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingHandle {
    pub hash: TxHash,
}

/// Terminal outcome of a pending transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Mined { block: Option<u64> },
    /// The reason is passed through to the caller uninterpreted
    Failed { reason: String },
}

/// Typed façade over the ledger contract
#[async_trait]
pub trait ChainClient: Clone + Send + Sync + 'static {
    /// Read every entry in ledger order. All or nothing.
    async fn fetch_all(&self) -> Result<Vec<Entry>, ChainError>;

    /// Read the ledger's total-appended counter
    async fn fetch_total_count(&self) -> Result<u64, ChainError>;

    /// Submit an append signed by `signer`; returns once it is in the pending pool
    async fn send_append(
        &self,
        signer: &Address,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<PendingHandle, ChainError>;

    /// Wait for the terminal outcome of a pending append
    async fn await_confirmation(&self, handle: &PendingHandle) -> Result<Confirmation, ChainError>;

    /// Deliver newly appended entries into `sink` until unsubscribed
    async fn subscribe(&self, sink: EntrySink) -> Result<SubscriptionHandle, ChainError>;

    /// Release a subscription
    fn unsubscribe(&self, handle: SubscriptionHandle) {
        handle.unsubscribe();
    }
}
