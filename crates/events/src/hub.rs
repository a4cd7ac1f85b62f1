//! Fan-out broadcaster for [`RunNotification`]s.
//!
//! The hub keeps a registry of live subscribers behind an `RwLock` and
//! delivers each published event to every matching subscriber over an
//! unbounded mpsc channel. Delivery to one subscriber can never block or
//! fail delivery to another; a subscriber whose receiving end is gone is
//! removed from the registry as part of the same `publish` call, so the
//! registry is self-healing without a separate reaper task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};

use swapbench_core::types::DbId;

use crate::notification::RunNotification;

/// Opaque token identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// One registered observer: the outbound channel plus an optional
/// run-id filter.
struct Subscriber {
    sender: mpsc::UnboundedSender<RunNotification>,
    /// When set, only events for this run are delivered.
    run_filter: Option<DbId>,
}

/// Thread-safe notification broadcaster.
///
/// Designed to be wrapped in `Arc` and shared between the run
/// coordinator (publisher) and any number of presentation-layer
/// observers. `subscribe`, `unsubscribe`, and `publish` may all be
/// called concurrently.
pub struct NotificationHub {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<u64, Subscriber>>,
}

impl NotificationHub {
    /// Create an empty hub. With zero subscribers `publish` is a cheap
    /// no-op, so the coordinator never needs to branch on "is anyone
    /// listening".
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Register an observer for all runs.
    ///
    /// No backlog is replayed: only transitions occurring after this call
    /// are delivered.
    pub async fn subscribe(
        &self,
    ) -> (SubscriptionHandle, mpsc::UnboundedReceiver<RunNotification>) {
        self.add_subscriber(None).await
    }

    /// Register an observer scoped to a single run.
    pub async fn subscribe_run(
        &self,
        run_id: DbId,
    ) -> (SubscriptionHandle, mpsc::UnboundedReceiver<RunNotification>) {
        self.add_subscriber(Some(run_id)).await
    }

    async fn add_subscriber(
        &self,
        run_filter: Option<DbId>,
    ) -> (SubscriptionHandle, mpsc::UnboundedReceiver<RunNotification>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.insert(
            id,
            Subscriber {
                sender: tx,
                run_filter,
            },
        );
        tracing::debug!(subscription = id, ?run_filter, "Subscriber registered");
        (SubscriptionHandle(id), rx)
    }

    /// Remove a subscription. Removing an already-removed handle is a
    /// no-op, not an error; disconnect paths may call this unconditionally.
    pub async fn unsubscribe(&self, handle: SubscriptionHandle) {
        if self.subscribers.write().await.remove(&handle.0).is_some() {
            tracing::debug!(subscription = handle.0, "Subscriber removed");
        }
    }

    /// Deliver `event` to every live subscriber whose filter matches.
    ///
    /// Subscribers whose channel is closed are treated as dead and
    /// removed before this call returns.
    pub async fn publish(&self, event: RunNotification) {
        let dead: Vec<u64> = {
            let subs = self.subscribers.read().await;
            if subs.is_empty() {
                return;
            }
            subs.iter()
                .filter(|(_, sub)| sub.run_filter.map_or(true, |run| run == event.run_id))
                .filter_map(|(id, sub)| sub.sender.send(event.clone()).err().map(|_| *id))
                .collect()
        };

        if !dead.is_empty() {
            let mut subs = self.subscribers.write().await;
            for id in dead {
                subs.remove(&id);
                tracing::debug!(subscription = id, "Removed dead subscriber during publish");
            }
        }
    }

    /// Current number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
