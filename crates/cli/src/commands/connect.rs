// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `munch connect`

use super::controller;
use anyhow::Result;
use munch_core::Config;

pub async fn connect(config: &Config) -> Result<()> {
    let mut controller = controller(config)?;
    let account = controller.connect().await?;
    controller.pump();

    println!("Connected: {}", account);
    println!("Meals: {}", controller.current_entries().len());
    controller.disconnect();
    Ok(())
}
