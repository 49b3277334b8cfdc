// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger contract client over JSON-RPC
//!
//! Reads go to the node endpoint. Appends go to the wallet endpoint as
//! `eth_sendTransaction`; the wallet holds the key and signs. Live entries
//! come from polling `eth_getLogs` starting at the block that was current
//! when the subscription was registered.

use crate::abi;
use crate::rpc::{from_data, from_quantity, to_data, to_quantity, JsonRpcClient, RpcError};
use async_trait::async_trait;
use munch_core::{
    Address, ChainClient, ChainError, Config, Confirmation, Entry, EntrySink, LiveFeed,
    PendingHandle, SubscriptionHandle, SubscriptionId, TxHash,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Receipt fields the client looks at
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Receipt {
    status: Option<String>,
    block_number: Option<String>,
}

/// Log fields the client looks at
#[derive(Debug, Deserialize)]
struct Log {
    topics: Vec<String>,
    data: String,
    #[serde(default)]
    removed: bool,
}

/// Chain client backed by a JSON-RPC node
#[derive(Debug, Clone)]
pub struct RpcChainClient {
    node: JsonRpcClient,
    signer: JsonRpcClient,
    contract: Address,
    gas_limit: u64,
    poll_interval: Duration,
    next_subscription: Arc<AtomicU64>,
}

impl RpcChainClient {
    pub fn new(config: &Config) -> Result<Self, ChainError> {
        let node = JsonRpcClient::new(config.rpc_url.clone()).map_err(network)?;
        let signer = JsonRpcClient::new(config.wallet_url()).map_err(network)?;
        Ok(Self {
            node,
            signer,
            contract: config.contract_address,
            gas_limit: config.gas_limit,
            poll_interval: config.poll_interval,
            next_subscription: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    async fn eth_call(&self, data: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([{ "to": self.contract.to_string(), "data": to_data(&data) }, "latest"]);
        let result: String = self.node.call("eth_call", params).await.map_err(network)?;
        from_data(&result).map_err(network)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        let result: String = self
            .node
            .call("eth_blockNumber", json!([]))
            .await
            .map_err(network)?;
        from_quantity(&result).map_err(network)
    }

    async fn logs(&self, from: u64, to: u64) -> Result<Vec<Log>, ChainError> {
        let topic = to_data(&abi::new_munch_topic());
        let params = json!([{
            "address": self.contract.to_string(),
            "topics": [topic],
            "fromBlock": to_quantity(from),
            "toBlock": to_quantity(to),
        }]);
        self.node.call("eth_getLogs", params).await.map_err(network)
    }

    /// One poll cycle: deliver logs in `[from, latest]`, return the next start block
    async fn poll_once(&self, from: u64, feed: &LiveFeed) -> Result<u64, ChainError> {
        let latest = self.block_number().await?;
        if latest < from {
            return Ok(from);
        }

        for log in self.logs(from, latest).await? {
            if log.removed {
                continue;
            }
            match decode_log(&log) {
                Ok(entry) => {
                    if !feed.deliver(entry) {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "skipping undecodable log"),
            }
        }
        Ok(latest.saturating_add(1))
    }
}

fn network(e: RpcError) -> ChainError {
    ChainError::Network(e.to_string())
}

fn decode_log(log: &Log) -> Result<Entry, ChainError> {
    let topics = log
        .topics
        .iter()
        .map(|t| {
            let bytes = from_data(t).map_err(network)?;
            <[u8; 32]>::try_from(bytes.as_slice())
                .map_err(|_| ChainError::Decode(format!("topic is not 32 bytes: {}", t)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let data = from_data(&log.data).map_err(network)?;
    abi::decode_new_munch(&topics, &data).map_err(|e| ChainError::Decode(e.to_string()))
}

/// Map a failed `eth_sendTransaction` onto the submission taxonomy
fn send_error(e: RpcError) -> ChainError {
    if e.is_user_rejection() {
        ChainError::UserRejected
    } else if let RpcError::Rpc { message, .. } = e {
        ChainError::SubmissionRejected(message)
    } else {
        network(e)
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn fetch_all(&self) -> Result<Vec<Entry>, ChainError> {
        let data = self.eth_call(abi::encode_get_all_meals()).await?;
        abi::decode_meals(&data).map_err(|e| ChainError::Decode(e.to_string()))
    }

    async fn fetch_total_count(&self) -> Result<u64, ChainError> {
        let data = self.eth_call(abi::encode_get_total_meals()).await?;
        abi::decode_total(&data).map_err(|e| ChainError::Decode(e.to_string()))
    }

    async fn send_append(
        &self,
        signer: &Address,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<PendingHandle, ChainError> {
        let params = json!([{
            "from": signer.to_string(),
            "to": self.contract.to_string(),
            "gas": to_quantity(self.gas_limit),
            "data": to_data(&abi::encode_munch(what, place, why)),
        }]);
        let result: String = self
            .signer
            .call("eth_sendTransaction", params)
            .await
            .map_err(send_error)?;
        let hash: TxHash = result
            .parse()
            .map_err(|e| ChainError::Decode(format!("transaction hash {}: {}", result, e)))?;
        Ok(PendingHandle { hash })
    }

    async fn await_confirmation(&self, handle: &PendingHandle) -> Result<Confirmation, ChainError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let receipt: Option<Receipt> = self
                .node
                .call("eth_getTransactionReceipt", json!([handle.hash.to_string()]))
                .await
                .map_err(network)?;

            let Some(receipt) = receipt else {
                continue;
            };
            let block = receipt
                .block_number
                .as_deref()
                .map(from_quantity)
                .transpose()
                .map_err(network)?;

            // Receipts without a status field predate status codes; inclusion means success
            return Ok(match receipt.status.as_deref() {
                Some("0x0") => Confirmation::Failed {
                    reason: "transaction reverted".to_string(),
                },
                _ => Confirmation::Mined { block },
            });
        }
    }

    async fn subscribe(&self, sink: EntrySink) -> Result<SubscriptionHandle, ChainError> {
        let start = self.block_number().await?;
        let id = SubscriptionId(format!(
            "logs-{}",
            self.next_subscription.fetch_add(1, Ordering::Relaxed)
        ));
        let (handle, feed) = SubscriptionHandle::open(id.clone(), sink);

        let client = self.clone();
        let task = tokio::spawn(async move {
            let mut next = start;
            let mut ticker = tokio::time::interval(client.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while feed.is_active() {
                ticker.tick().await;
                match client.poll_once(next, &feed).await {
                    Ok(block) => next = block,
                    Err(e) => tracing::warn!(subscription = %id, error = %e, "log poll failed"),
                }
            }
            tracing::debug!(subscription = %id, "log polling stopped");
        });

        Ok(handle.with_task(task))
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
