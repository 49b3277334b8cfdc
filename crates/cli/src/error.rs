// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use munch_engine::SyncError;
use std::fmt;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// No account has been authorized for this client yet
    pub fn not_authorized() -> Self {
        CliError::new("No authorized wallet account")
            .with_context("The wallet has not granted this client access")
            .with_suggestion("Connect first: munch connect")
            .with_suggestion("Or connect while submitting: munch submit --connect ...")
    }

    /// A meal field failed validation
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        CliError::new(format!("Invalid {}: {}", field, reason))
            .with_context("Each of what, where and why must be 2 to 25 characters")
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        let base = CliError::new(e.to_string());
        match e {
            SyncError::WalletUnavailable(_) => base
                .with_context("No wallet answered at the configured wallet endpoint")
                .with_suggestion("Check wallet_url (or rpc_url): munch config"),
            SyncError::Network(_) => base
                .with_context("The ledger node could not be reached or returned bad data")
                .with_suggestion("Check rpc_url: munch config"),
            SyncError::UserRejected => base.with_context("The request was declined in the wallet"),
            SyncError::TransactionFailed { .. } => {
                base.with_context("The transaction was mined but did not succeed; nothing was recorded")
            }
            SyncError::SubmissionRejected(_)
            | SyncError::NotReady(_)
            | SyncError::ProtocolViolation(_) => base,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Render any command error for stderr
pub fn render(e: &anyhow::Error) -> String {
    if let Some(cli) = e.downcast_ref::<CliError>() {
        return cli.to_string();
    }
    if let Some(sync) = e.downcast_ref::<SyncError>() {
        return CliError::from(sync.clone()).to_string();
    }
    format!("error: {:#}\n", e)
}
