// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! munch - meal ledger client

mod commands;
mod error;
mod output;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{connect, count, meals, submit};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "munch",
    version,
    about = "Munch - share what you ate on the meal ledger"
)]
struct Cli {
    /// Config file (defaults to $MUNCH_CONFIG, then ./munch.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the wallet and load the ledger
    Connect,
    /// Print the meal history
    Meals(meals::MealsArgs),
    /// Print the meal history, then follow new meals until Ctrl-C
    Watch,
    /// Share a meal
    Submit(submit::SubmitArgs),
    /// Print the ledger's total meal count
    Count,
    /// Print the resolved configuration
    Config,
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprint!("{}", error::render(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = settings::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Connect => connect::connect(&config).await,
        Commands::Meals(args) => meals::meals(&config, args).await,
        Commands::Watch => meals::watch(&config).await,
        Commands::Submit(args) => submit::submit(&config, args).await,
        Commands::Count => count::count(&config).await,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
