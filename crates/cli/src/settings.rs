// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration lookup for the CLI

use anyhow::{Context, Result};
use munch_core::Config;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const LOCAL_CONFIG: &str = "munch.toml";

/// Which file, if any, the configuration comes from
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os("MUNCH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    local.is_file().then_some(local)
}

/// Load the config file (or defaults) and apply environment overrides
pub fn resolve(explicit: Option<&Path>) -> Result<Config> {
    let config = match config_path(explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Config::load(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => Config::default(),
    };

    config
        .with_overrides(|key| std::env::var(key).ok())
        .context("invalid configuration override")
}
