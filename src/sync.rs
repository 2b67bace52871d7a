//! Cross-context cart reconciliation.

use tracing::debug;

use crate::{
    core::store::CartStore,
    persist::{
        KeyValueStore,
        origin::{StorageChange, Subscription},
    },
};

/// Keeps one context's cart in step with writes made by other contexts.
///
/// Reconciliation is a full replace: the in-memory cart is discarded and
/// reloaded from the medium, so the last durable write wins.
pub struct CrossTabSync {
    subscription: Option<Subscription>,
}

impl CrossTabSync {
    /// Reconciles on changes delivered to `subscription`.
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription: Some(subscription),
        }
    }

    /// Reloads `store` if `change` concerns its key. Returns whether it did.
    pub fn apply<S: KeyValueStore>(change: &StorageChange, store: &mut CartStore<S>) -> bool {
        if change.key != store.storage().key() {
            return false;
        }
        store.reload();
        debug!(key = %change.key, source = ?change.source, "cart reconciled from storage");
        true
    }

    /// A synchronizer that never reconciles, for contexts that do not share
    /// their medium.
    pub fn detached() -> Self {
        Self { subscription: None }
    }

    /// Whether change notifications are still attached.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Waits for the next relevant change. Pends forever once unsubscribed
    /// or once the origin is gone.
    pub async fn next_change(&mut self) -> StorageChange {
        if let Some(sub) = self.subscription.as_mut() {
            if let Some(change) = sub.recv().await {
                return change;
            }
            self.subscription = None;
        }
        std::future::pending().await
    }

    /// Applies every change already delivered. Returns whether the store was
    /// reloaded.
    pub fn poll<S: KeyValueStore>(&mut self, store: &mut CartStore<S>) -> bool {
        let Some(sub) = self.subscription.as_mut() else {
            return false;
        };

        let mut reloaded = false;
        while let Some(change) = sub.try_recv() {
            reloaded |= Self::apply(&change, store);
        }
        reloaded
    }

    /// Detaches from change notifications. Later changes are ignored.
    pub fn unsubscribe(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
        }
    }
}
