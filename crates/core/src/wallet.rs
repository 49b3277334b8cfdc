// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wallet session state machine
//!
//! ```text
//! Disconnected --connect()--> Connecting --ok--> Connected(account)
//!      ^                          |
//!      +-------- error -----------+
//! Disconnected --restore_if_authorized()--> Connected(account)   (no prompt)
//! Connected --disconnect()--> Disconnected                       (wallet-initiated)
//! ```

use crate::adapters::{WalletError, WalletProvider};
use crate::address::Address;
use tracing::{debug, info, warn};

/// Connection state of the wallet session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(Address),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected(account) => write!(f, "connected ({})", account),
        }
    }
}

/// Owns the signing identity for one application session
#[derive(Debug)]
pub struct WalletSession<W> {
    provider: W,
    state: ConnectionState,
}

impl<W: WalletProvider> WalletSession<W> {
    /// Create a session in the `Disconnected` state
    pub fn new(provider: W) -> Self {
        Self {
            provider,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn current_account(&self) -> Option<Address> {
        match self.state {
            ConnectionState::Connected(account) => Some(account),
            _ => None,
        }
    }

    /// Request account access, prompting the user if needed
    pub async fn connect(&mut self) -> Result<Address, WalletError> {
        self.state = ConnectionState::Connecting;

        let result = match self.provider.request_accounts().await {
            // An empty grant means the user dismissed the prompt
            Ok(accounts) => accounts.first().copied().ok_or(WalletError::UserRejected),
            Err(e) => Err(e),
        };

        match result {
            Ok(account) => {
                info!(%account, "wallet connected");
                self.state = ConnectionState::Connected(account);
                Ok(account)
            }
            Err(e) => {
                warn!(error = %e, "wallet connect failed");
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Reuse an earlier authorization without prompting.
    ///
    /// Returns `Ok(None)` and ends `Disconnected` when nothing is authorized,
    /// which also applies a wallet-side revocation of an earlier connection.
    pub async fn restore_if_authorized(&mut self) -> Result<Option<Address>, WalletError> {
        let accounts = match self.provider.authorized_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                self.disconnect();
                return Err(e);
            }
        };
        match accounts.first().copied() {
            Some(account) => {
                info!(%account, "found authorized account");
                self.state = ConnectionState::Connected(account);
                Ok(Some(account))
            }
            None => {
                debug!("no authorized account found");
                self.disconnect();
                Ok(None)
            }
        }
    }

    /// Apply a wallet-initiated disconnect
    pub fn disconnect(&mut self) {
        if self.state.is_connected() {
            info!("wallet disconnected");
        }
        self.state = ConnectionState::Disconnected;
    }

    pub fn provider(&self) -> &W {
        &self.provider
    }
}

#[cfg(test)]
#[path = "wallet_tests.rs"]
mod tests;
