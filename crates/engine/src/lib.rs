// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! munch-engine: keeps a local meal cache in sync with the ledger
//!
//! [`SyncController`] connects the wallet, bulk-loads the ledger, and keeps
//! the cache current from the live subscription. Submissions go out through
//! the controller and come back through the live path.

mod controller;
mod error;
mod live;

pub use controller::{SyncController, SyncState};
pub use error::SyncError;
pub use live::LiveSubscription;
