// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the ledger node and the host wallet

pub mod abi;
pub mod chain;
pub mod rpc;
pub mod traced;
pub mod wallet;

pub use chain::RpcChainClient;
pub use rpc::{JsonRpcClient, RpcError};
pub use traced::{TracedChainClient, TracedWallet};
pub use wallet::RpcWallet;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLedger, LedgerCall};
