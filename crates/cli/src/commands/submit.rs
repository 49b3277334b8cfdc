// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `munch submit`

use super::{controller, restore};
use crate::error::CliError;
use crate::output::{self, MealCard, OutputFormat};
use anyhow::Result;
use clap::Args;
use munch_core::{Address, Config, Entry};
use std::time::Duration;

/// Field length bounds, in characters
pub const MIN_FIELD_LEN: usize = 2;
pub const MAX_FIELD_LEN: usize = 25;

/// Poll intervals to wait for the new meal to come back on the live feed
const LIVE_WAIT_POLLS: u32 = 5;

#[derive(Args)]
pub struct SubmitArgs {
    /// What you ate
    pub what: String,
    /// Where you ate it
    #[arg(value_name = "WHERE")]
    pub place: String,
    /// Why you ate it
    pub why: String,
    /// Ask the wallet for access instead of reusing an earlier authorization
    #[arg(long)]
    pub connect: bool,
}

/// Check one form field against the length rules.
///
/// Lengths count the text exactly as it is submitted, padding included.
pub fn validate_field(field: &str, value: &str) -> Result<(), CliError> {
    if value.trim().is_empty() {
        return Err(CliError::invalid_field(field, "required"));
    }
    let len = value.chars().count();
    if len < MIN_FIELD_LEN {
        return Err(CliError::invalid_field(field, "too short"));
    }
    if len > MAX_FIELD_LEN {
        return Err(CliError::invalid_field(field, "too long"));
    }
    Ok(())
}

fn validate(args: &SubmitArgs) -> Result<(), CliError> {
    validate_field("what", &args.what)?;
    validate_field("where", &args.place)?;
    validate_field("why", &args.why)
}

/// How long to wait for the mined meal on the live feed
fn live_wait(poll_interval: Duration) -> Duration {
    poll_interval
        .checked_mul(LIVE_WAIT_POLLS)
        .unwrap_or(Duration::MAX)
}

fn is_ours(entry: &Entry, account: &Address, args: &SubmitArgs) -> bool {
    entry.submitter == *account
        && entry.what == args.what
        && entry.place == args.place
        && entry.why == args.why
}

pub async fn submit(config: &Config, args: SubmitArgs) -> Result<()> {
    validate(&args)?;

    let mut controller = controller(config)?;
    let account = if args.connect {
        controller.connect().await?
    } else {
        restore(&mut controller).await?
    };

    let pending = controller
        .begin_submit(&args.what, &args.place, &args.why)
        .await?;
    println!("Mining... {}", pending.hash);

    let outcome = controller.finish_submit(&pending).await?;
    println!("Mined -- {}", outcome.hash);
    if let Some(total) = outcome.ledger_total {
        println!("Total meals: {}", total);
    }

    // Mined entries reach the cache only through the live feed
    let wait = live_wait(config.poll_interval);
    let arrived = tokio::time::timeout(wait, async {
        while let Some(entry) = controller.next_live_entry().await {
            if is_ours(&entry, &account, &args) {
                return Some(entry);
            }
        }
        None
    })
    .await;

    match arrived {
        Ok(Some(entry)) => output::print(&MealCard::from(&entry), OutputFormat::Text),
        _ => tracing::warn!(
            hash = %outcome.hash,
            "mined meal not seen on the live feed yet"
        ),
    }

    controller.disconnect();
    Ok(())
}
