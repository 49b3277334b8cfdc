// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! rpc_url = "http://127.0.0.1:8545"
//! wallet_url = "http://127.0.0.1:1248"   # optional, defaults to rpc_url
//! contract_address = "0x58e4b3830e0FDdeb90eD22b6CbEa55c49cecFd6b"
//! gas_limit = 300000
//! poll_interval = "4s"
//! ```

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default ledger contract
pub const DEFAULT_CONTRACT: Address = Address::new([
    0x58, 0xe4, 0xb3, 0x83, 0x0e, 0x0f, 0xdd, 0xeb, 0x90, 0xed, 0x22, 0xb6, 0xcb, 0xea, 0x55, 0xc4,
    0x9c, 0xec, 0xfd, 0x6b,
]);

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Ledger and wallet endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON-RPC endpoint used for reads and log polling
    pub rpc_url: String,
    /// JSON-RPC endpoint of the wallet that holds the signing key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_url: Option<String>,
    pub contract_address: Address,
    /// Gas allowance attached to every append
    pub gas_limit: u64,
    /// Interval for log and receipt polling
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_url: None,
            contract_address: DEFAULT_CONTRACT,
            gas_limit: DEFAULT_GAS_LIMIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Apply `MUNCH_RPC_URL`, `MUNCH_WALLET_URL` and `MUNCH_CONTRACT` overrides
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MUNCH_RPC_URL") {
            self.rpc_url = url;
        }
        if let Some(url) = lookup("MUNCH_WALLET_URL") {
            self.wallet_url = Some(url);
        }
        if let Some(addr) = lookup("MUNCH_CONTRACT") {
            self.contract_address = addr.parse().map_err(|e| ConfigError::Invalid {
                field: "contract_address",
                reason: format!("{}: {}", addr, e),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "rpc_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.wallet_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "wallet_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.gas_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "gas_limit",
                reason: "must be positive".to_string(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "poll_interval",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Endpoint of the signing wallet
    pub fn wallet_url(&self) -> &str {
        self.wallet_url.as_deref().unwrap_or(&self.rpc_url)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
