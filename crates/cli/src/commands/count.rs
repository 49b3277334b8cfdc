// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `munch count`

use super::chain;
use anyhow::Result;
use munch_core::{ChainClient, Config};
use munch_engine::SyncError;

pub async fn count(config: &Config) -> Result<()> {
    let total = chain(config)?
        .fetch_total_count()
        .await
        .map_err(SyncError::from)?;
    println!("Total meals: {}", total);
    Ok(())
}
