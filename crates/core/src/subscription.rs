// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live subscription plumbing
//!
//! A consumer hands the chain client an [`EntrySink`]. The client wraps it in
//! a [`LiveFeed`] for its delivery loop and returns the paired
//! [`SubscriptionHandle`] to the consumer. Unsubscribing flips a shared flag
//! that the feed checks before every delivery, so nothing is delivered after
//! `unsubscribe` returns. A delivery is a single non-blocking channel send,
//! so a delivery in progress is never cut in half.

use crate::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channel end that receives live entries
pub type EntrySink = mpsc::UnboundedSender<Entry>;

/// Identifier for a live subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub String);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery side of a subscription, owned by the chain client
#[derive(Debug, Clone)]
pub struct LiveFeed {
    sink: EntrySink,
    active: Arc<AtomicBool>,
}

impl LiveFeed {
    /// Deliver one entry. Returns false once the subscription is gone.
    pub fn deliver(&self, entry: Entry) -> bool {
        if !self.is_active() {
            return false;
        }
        self.sink.send(entry).is_ok()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && !self.sink.is_closed()
    }
}

/// Consumer side of a subscription
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Pair a handle with the feed that delivers into `sink`
    pub fn open(id: SubscriptionId, sink: EntrySink) -> (SubscriptionHandle, LiveFeed) {
        let active = Arc::new(AtomicBool::new(true));
        let handle = SubscriptionHandle {
            id,
            active: Arc::clone(&active),
            task: None,
        };
        (handle, LiveFeed { sink, active })
    }

    /// Attach the background task driving the feed; it is aborted on unsubscribe
    pub fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop future deliveries
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
