// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod connect;
pub mod count;
pub mod meals;
pub mod submit;

use crate::error::CliError;
use anyhow::{Context, Result};
use munch_adapters::{RpcChainClient, RpcWallet, TracedChainClient, TracedWallet};
use munch_core::{Address, Config};
use munch_engine::{SyncController, SyncError};

pub type Controller = SyncController<TracedChainClient<RpcChainClient>, TracedWallet<RpcWallet>>;

/// Ledger client for the configured node
pub fn chain(config: &Config) -> Result<TracedChainClient<RpcChainClient>> {
    let chain = RpcChainClient::new(config)
        .map_err(SyncError::from)
        .context("failed to set up ledger client")?;
    Ok(TracedChainClient::new(chain))
}

/// Controller wired to the configured node and wallet
pub fn controller(config: &Config) -> Result<Controller> {
    let wallet = RpcWallet::new(config)
        .map_err(SyncError::from)
        .context("failed to set up wallet client")?;
    Ok(SyncController::new(chain(config)?, TracedWallet::new(wallet)))
}

/// Reuse an earlier wallet authorization and load the ledger
pub async fn restore(controller: &mut Controller) -> Result<Address> {
    match controller.restore_if_authorized().await? {
        Some(account) => Ok(account),
        None => Err(CliError::not_authorized().into()),
    }
}
