// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter traits for the ledger contract and the host wallet

pub mod traits;

pub use traits::{
    ChainClient, ChainError, Confirmation, PendingHandle, WalletError, WalletProvider,
};
