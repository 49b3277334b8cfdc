// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `munch meals` and `munch watch`

use super::{controller, restore};
use crate::output::{self, MealCard, OutputFormat};
use anyhow::Result;
use clap::Args;
use munch_core::Config;

#[derive(Args)]
pub struct MealsArgs {
    /// Print JSON instead of cards
    #[arg(long)]
    pub json: bool,
}

pub async fn meals(config: &Config, args: MealsArgs) -> Result<()> {
    let mut controller = controller(config)?;
    restore(&mut controller).await?;
    controller.pump();

    let entries = controller.current_entries();
    output::print_list(&output::cards(&entries), OutputFormat::from_json_flag(args.json));
    controller.disconnect();
    Ok(())
}

pub async fn watch(config: &Config) -> Result<()> {
    let mut controller = controller(config)?;
    restore(&mut controller).await?;
    controller.pump();
    output::print_list(&output::cards(&controller.current_entries()), OutputFormat::Text);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            entry = controller.next_live_entry() => match entry {
                Some(entry) => output::print(&MealCard::from(&entry), OutputFormat::Text),
                None => {
                    tracing::warn!("live feed closed");
                    break;
                }
            },
            _ = &mut shutdown => break,
        }
    }

    controller.disconnect();
    Ok(())
}
