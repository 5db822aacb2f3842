//! Notification bus - process-wide broadcast of transient user-facing toasts.
//!
//! An explicit bus object injected into its consumers; subscribers receive
//! the full current list on every change through a broadcast channel, and
//! every published toast expires automatically after [`TOAST_TTL`].

use std::sync::Arc;
use std::time::Duration;

use glimpse_core::{Toast, ToastVariant};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// How long a toast stays visible unless dismissed early
pub const TOAST_TTL: Duration = Duration::from_secs(5);

const CHANNEL_CAPACITY: usize = 64;

/// Per-toast lifecycle: created -> visible -> (expired or dismissed) -> removed.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    toasts: Mutex<Vec<Toast>>,
    sender: broadcast::Sender<Vec<Toast>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(BusInner {
                toasts: Mutex::new(Vec::new()),
                sender,
            }),
        }
    }

    /// Publish a toast. All current subscribers are notified synchronously
    /// with the new list; removal is scheduled after [`TOAST_TTL`]. Returns
    /// the toast id for optional early dismissal.
    ///
    /// Must be called from within a tokio runtime (the expiry timer is a
    /// spawned task).
    pub fn publish(
        &self,
        title: impl Into<String>,
        description: Option<String>,
        variant: ToastVariant,
    ) -> String {
        let toast = Toast::new(title, description, variant);
        let id = toast.id.clone();

        let snapshot = {
            let mut toasts = self.inner.toasts.lock();
            toasts.push(toast);
            toasts.clone()
        };
        let _ = self.inner.sender.send(snapshot);

        let bus = self.clone();
        let expired_id = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            bus.dismiss(&expired_id);
        });

        id
    }

    /// Remove a toast by id. Idempotent: unknown ids and repeat dismissals
    /// leave the list untouched and notify nobody.
    pub fn dismiss(&self, id: &str) {
        let snapshot = {
            let mut toasts = self.inner.toasts.lock();
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            if toasts.len() == before {
                return;
            }
            toasts.clone()
        };
        let _ = self.inner.sender.send(snapshot);
    }

    /// Register for list snapshots. Dropping the handle unsubscribes without
    /// affecting other subscribers.
    pub fn subscribe(&self) -> ToastSubscription {
        ToastSubscription {
            rx: self.inner.sender.subscribe(),
        }
    }

    /// Current toast list
    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.toasts.lock().clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription handle over the bus's snapshot stream
pub struct ToastSubscription {
    rx: broadcast::Receiver<Vec<Toast>>,
}

impl ToastSubscription {
    /// Wait for the next list change. `None` once the bus is gone.
    pub async fn changed(&mut self) -> Option<Vec<Toast>> {
        loop {
            match self.rx.recv().await {
                Ok(list) => return Some(list),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
