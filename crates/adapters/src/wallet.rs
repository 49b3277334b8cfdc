// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host wallet reached over JSON-RPC
//!
//! Wallet bridges (and dev nodes with unlocked accounts) answer the same
//! account methods a browser wallet exposes: `eth_requestAccounts` may prompt,
//! `eth_accounts` never does.

use crate::rpc::{JsonRpcClient, RpcError};
use async_trait::async_trait;
use munch_core::{Address, Config, WalletError, WalletProvider};
use serde_json::json;

/// Wallet provider backed by a JSON-RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcWallet {
    rpc: JsonRpcClient,
}

impl RpcWallet {
    pub fn new(config: &Config) -> Result<Self, WalletError> {
        let rpc = JsonRpcClient::new(config.wallet_url()).map_err(wallet_error)?;
        Ok(Self { rpc })
    }

    async fn accounts(&self, method: &str) -> Result<Vec<Address>, RpcError> {
        let raw: Vec<String> = self.rpc.call(method, json!([])).await?;
        raw.iter()
            .map(|s| {
                s.parse()
                    .map_err(|e| RpcError::Malformed(format!("account {}: {}", s, e)))
            })
            .collect()
    }
}

pub(crate) fn wallet_error(e: RpcError) -> WalletError {
    if e.is_user_rejection() {
        WalletError::UserRejected
    } else if e.is_unreachable() {
        WalletError::Unavailable(e.to_string())
    } else {
        WalletError::Provider(e.to_string())
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        match self.accounts("eth_requestAccounts").await {
            // Nodes without a permission layer expose their accounts directly
            Err(e) if e.is_method_not_found() => {
                self.accounts("eth_accounts").await.map_err(wallet_error)
            }
            result => result.map_err(wallet_error),
        }
    }

    async fn authorized_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.accounts("eth_accounts").await.map_err(wallet_error)
    }
}
