// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use async_trait::async_trait;
use munch_core::{
    Address, ChainClient, ChainError, Confirmation, Entry, EntrySink, PendingHandle,
    SubscriptionHandle, WalletError, WalletProvider,
};
use std::time::Instant;
use tracing::Instrument;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Wrapper that adds tracing to any ChainClient
#[derive(Clone)]
pub struct TracedChainClient<C> {
    inner: C,
}

impl<C> TracedChainClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ChainClient> ChainClient for TracedChainClient<C> {
    async fn fetch_all(&self) -> Result<Vec<Entry>, ChainError> {
        async {
            tracing::debug!("starting");
            let start = Instant::now();
            let result = self.inner.fetch_all().await;

            match &result {
                Ok(entries) => tracing::info!(
                    count = entries.len(),
                    elapsed_ms = elapsed_ms(start),
                    "entries fetched"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "fetch failed"
                ),
            }
            result
        }
        .instrument(tracing::info_span!("chain.fetch_all"))
        .await
    }

    async fn fetch_total_count(&self) -> Result<u64, ChainError> {
        async {
            let result = self.inner.fetch_total_count().await;
            match &result {
                Ok(total) => tracing::debug!(total, "total read"),
                Err(e) => tracing::warn!(error = %e, "total read failed"),
            }
            result
        }
        .instrument(tracing::debug_span!("chain.fetch_total_count"))
        .await
    }

    async fn send_append(
        &self,
        signer: &Address,
        what: &str,
        place: &str,
        why: &str,
    ) -> Result<PendingHandle, ChainError> {
        let span = tracing::info_span!("chain.send_append", signer = %signer);
        async {
            tracing::info!(
                what_len = what.len(),
                where_len = place.len(),
                why_len = why.len(),
                "submitting"
            );
            let start = Instant::now();
            let result = self.inner.send_append(signer, what, place, why).await;

            match &result {
                Ok(handle) => tracing::info!(
                    hash = %handle.hash,
                    elapsed_ms = elapsed_ms(start),
                    "transaction pending"
                ),
                Err(ChainError::UserRejected) => tracing::info!(
                    elapsed_ms = elapsed_ms(start),
                    "signature declined"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "submission failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn await_confirmation(&self, handle: &PendingHandle) -> Result<Confirmation, ChainError> {
        let span = tracing::info_span!("chain.await_confirmation", hash = %handle.hash);
        async {
            let start = Instant::now();
            let result = self.inner.await_confirmation(handle).await;

            match &result {
                Ok(Confirmation::Mined { block }) => tracing::info!(
                    block = ?block,
                    elapsed_ms = elapsed_ms(start),
                    "transaction mined"
                ),
                Ok(Confirmation::Failed { reason }) => tracing::warn!(
                    reason = %reason,
                    elapsed_ms = elapsed_ms(start),
                    "transaction failed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "confirmation lost"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn subscribe(&self, sink: EntrySink) -> Result<SubscriptionHandle, ChainError> {
        async {
            let result = self.inner.subscribe(sink).await;
            match &result {
                Ok(handle) => tracing::info!(subscription = %handle.id(), "subscribed"),
                Err(e) => tracing::error!(error = %e, "subscribe failed"),
            }
            result
        }
        .instrument(tracing::info_span!("chain.subscribe"))
        .await
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        tracing::info!(subscription = %handle.id(), "unsubscribing");
        self.inner.unsubscribe(handle);
    }
}

/// Wrapper that adds tracing to any WalletProvider
#[derive(Clone)]
pub struct TracedWallet<W> {
    inner: W,
}

impl<W> TracedWallet<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

#[async_trait]
impl<W: WalletProvider> WalletProvider for TracedWallet<W> {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        async {
            tracing::info!("requesting account access");
            let result = self.inner.request_accounts().await;
            match &result {
                Ok(accounts) => tracing::info!(count = accounts.len(), "access granted"),
                Err(WalletError::UserRejected) => tracing::info!("access declined"),
                Err(e) => tracing::error!(error = %e, "account request failed"),
            }
            result
        }
        .instrument(tracing::info_span!("wallet.request_accounts"))
        .await
    }

    async fn authorized_accounts(&self) -> Result<Vec<Address>, WalletError> {
        async {
            let result = self.inner.authorized_accounts().await;
            match &result {
                Ok(accounts) => tracing::debug!(count = accounts.len(), "authorized accounts"),
                Err(e) => tracing::warn!(error = %e, "account lookup failed"),
            }
            result
        }
        .instrument(tracing::debug_span!("wallet.authorized_accounts"))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
