// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! munch-core: data model and state machines for the meal ledger client
//!
//! This crate provides:
//! - The ledger data model (entries, addresses, transaction hashes)
//! - The entry store that merges bulk and live reads without duplicates
//! - The wallet session state machine
//! - Adapter traits for the ledger contract and the host wallet
//! - Configuration

pub mod address;
pub mod adapters;
pub mod config;
pub mod entry;
pub mod id;
pub mod store;
pub mod submission;
pub mod subscription;
pub mod wallet;

// Re-exports
pub use address::{Address, ParseHexError, TxHash};
pub use adapters::{ChainClient, ChainError, Confirmation, PendingHandle, WalletError, WalletProvider};
pub use config::{Config, ConfigError};
pub use entry::Entry;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use store::{EntryStore, MergeOutcome, StoreError};
pub use submission::{
    PendingSubmission, SubmissionId, SubmissionOutcome, SubmissionPhase, SubmissionStatus,
};
pub use subscription::{EntrySink, LiveFeed, SubscriptionHandle, SubscriptionId};
pub use wallet::{ConnectionState, WalletSession};
