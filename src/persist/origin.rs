//! Shared persistence medium with cross-context change notifications.
//!
//! An [`Origin`] owns one backing medium. Each execution context (a tab, a
//! window, a worker) attaches through [`Origin::context`] and reads and writes
//! through its own [`StorageContext`]. A write that actually changes a key
//! is announced to every *other* context subscribed to that key; a context
//! never hears its own writes.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::trace;

use crate::types::ContextId;

use super::{KeyValueStore, PersistResult};

/// Notification that a key was written or removed by some context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Key that changed.
    pub key: String,
    /// Context that wrote it. `None` when notifications were missed and the
    /// writer is unknown.
    pub source: Option<ContextId>,
}

/// One backing medium shared by many execution contexts.
#[derive(Clone)]
pub struct Origin {
    medium: Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<StorageChange>,
    next_context: Arc<AtomicU64>,
}

impl Origin {
    /// Wraps `medium`, buffering up to `capacity` undelivered notifications
    /// per subscriber.
    pub fn new(medium: impl KeyValueStore + 'static, capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            medium: Arc::new(medium),
            changes,
            next_context: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Attaches a new execution context with a fresh id.
    pub fn context(&self) -> StorageContext {
        let id = self.next_context.fetch_add(1, Ordering::Relaxed);
        StorageContext {
            id,
            medium: Arc::clone(&self.medium),
            changes: self.changes.clone(),
        }
    }
}

/// One execution context's view of an [`Origin`].
#[derive(Clone)]
pub struct StorageContext {
    id: ContextId,
    medium: Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<StorageChange>,
}

impl StorageContext {
    /// Identifier of this context.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Subscribes to writes of `key` made by other contexts.
    pub fn subscribe(&self, key: impl Into<String>) -> Subscription {
        Subscription {
            key: key.into(),
            owner: self.id,
            rx: self.changes.subscribe(),
        }
    }

    fn publish(&self, key: &str) {
        trace!(context = self.id, key, "publishing storage change");
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
            source: Some(self.id),
        });
    }
}

impl KeyValueStore for StorageContext {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        self.medium.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> PersistResult<()> {
        if self.medium.get_item(key)?.as_deref() == Some(value) {
            return Ok(());
        }
        self.medium.set_item(key, value)?;
        self.publish(key);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PersistResult<()> {
        if self.medium.get_item(key)?.is_none() {
            return Ok(());
        }
        self.medium.remove_item(key)?;
        self.publish(key);
        Ok(())
    }
}

/// Change notifications for one key, as seen by one context.
///
/// Dropping the subscription (or calling [`Subscription::unsubscribe`])
/// detaches it from the origin.
pub struct Subscription {
    key: String,
    owner: ContextId,
    rx: broadcast::Receiver<StorageChange>,
}

impl Subscription {
    /// Key this subscription watches.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Waits for the next foreign change to this key. Returns `None` once the
    /// origin is gone.
    pub async fn recv(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => {
                    if self.wants(&change) {
                        return Some(change);
                    }
                }
                Err(RecvError::Lagged(_)) => return Some(self.missed()),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next already-delivered foreign change, if any.
    pub fn try_recv(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => {
                    if self.wants(&change) {
                        return Some(change);
                    }
                }
                Err(TryRecvError::Lagged(_)) => return Some(self.missed()),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Detaches from the origin.
    pub fn unsubscribe(self) {
        trace!(context = self.owner, key = %self.key, "unsubscribed");
    }

    fn wants(&self, change: &StorageChange) -> bool {
        change.key == self.key && change.source != Some(self.owner)
    }

    // Missed notifications may have covered this key.
    fn missed(&self) -> StorageChange {
        StorageChange {
            key: self.key.clone(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::persist::memory::MemoryStore;

    use super::*;

    #[test]
    fn own_writes_are_not_echoed() {
        let origin = Origin::new(MemoryStore::new(), 16);
        let a = origin.context();
        let b = origin.context();
        let mut sub_a = a.subscribe("k");
        let mut sub_b = b.subscribe("k");

        a.set_item("k", "v1").unwrap();

        assert_eq!(sub_a.try_recv(), None);
        assert_eq!(
            sub_b.try_recv(),
            Some(StorageChange {
                key: "k".to_string(),
                source: Some(a.id()),
            })
        );
    }

    #[test]
    fn other_keys_and_unchanged_writes_are_filtered() {
        let origin = Origin::new(MemoryStore::new(), 16);
        let a = origin.context();
        let b = origin.context();
        let mut sub_b = b.subscribe("k");

        a.set_item("other", "x").unwrap();
        assert_eq!(sub_b.try_recv(), None);

        a.set_item("k", "same").unwrap();
        assert!(sub_b.try_recv().is_some());
        a.set_item("k", "same").unwrap();
        assert_eq!(sub_b.try_recv(), None);

        a.remove_item("missing").unwrap();
        assert_eq!(sub_b.try_recv(), None);
    }

    #[test]
    fn lagged_subscriber_reports_unknown_source() {
        let origin = Origin::new(MemoryStore::new(), 1);
        let a = origin.context();
        let b = origin.context();
        let mut sub_b = b.subscribe("k");

        a.set_item("k", "1").unwrap();
        a.set_item("k", "2").unwrap();
        a.set_item("k", "3").unwrap();

        let change = sub_b.try_recv().unwrap();
        assert_eq!(change.source, None);
        assert_eq!(change.key, "k");
    }
}
