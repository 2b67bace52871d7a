use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    config::StoreConfig,
    core::store::CartStore,
    persist::KeyValueStore,
    product::{CartLine, CartTotals, Product},
    sync::CrossTabSync,
    types::{ProductId, Quantity},
};

use super::events::CartEvent;

/// Errors returned by [`CartHandle`] calls.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The loop has stopped.
    #[error("cart loop is no longer running")]
    ChannelClosed,
}

/// Cloneable handle to a running cart loop.
#[derive(Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<CartEvent>,
}

enum Command {
    Add {
        product: Product,
        qty: Quantity,
        resp: oneshot::Sender<Quantity>,
    },
    Remove {
        id: ProductId,
        resp: oneshot::Sender<bool>,
    },
    UpdateQuantity {
        id: ProductId,
        qty: i64,
        resp: oneshot::Sender<Option<Quantity>>,
    },
    Clear {
        resp: oneshot::Sender<()>,
    },
    IsInCart {
        id: ProductId,
        resp: oneshot::Sender<bool>,
    },
    Lines {
        resp: oneshot::Sender<Vec<CartLine>>,
    },
    Totals {
        resp: oneshot::Sender<CartTotals>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop that owns `store`.
///
/// Commands are applied one at a time in arrival order. Changes announced by
/// `sync` are reconciled between commands, never in the middle of one.
pub fn spawn_cart<S>(mut store: CartStore<S>, mut sync: CrossTabSync, config: &StoreConfig) -> CartHandle
where
    S: KeyValueStore + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<CartEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut shutdown_resp = None;
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if let Flow::Stop(resp) = handle_command(cmd, &mut store, &events_tx_loop) {
                        shutdown_resp = Some(resp);
                        break;
                    }
                }
                change = sync.next_change() => {
                    if CrossTabSync::apply(&change, &mut store) {
                        let _ = events_tx_loop.send(CartEvent::Reconciled);
                    }
                }
            }
        }

        sync.unsubscribe();
        debug!("cart loop stopped");
        if let Some(resp) = shutdown_resp {
            let _ = resp.send(());
        }
    });

    CartHandle { cmd_tx, events_tx }
}

impl CartHandle {
    /// Receiver for events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events_tx.subscribe()
    }

    /// See [`CartStore::add_to_cart`].
    pub async fn add_to_cart(&self, product: Product, qty: Quantity) -> Result<Quantity, RuntimeError> {
        self.call(|resp| Command::Add { product, qty, resp }).await
    }

    /// See [`CartStore::remove_from_cart`].
    pub async fn remove_from_cart(&self, id: ProductId) -> Result<bool, RuntimeError> {
        self.call(|resp| Command::Remove { id, resp }).await
    }

    /// See [`CartStore::update_quantity`].
    pub async fn update_quantity(&self, id: ProductId, qty: i64) -> Result<Option<Quantity>, RuntimeError> {
        self.call(|resp| Command::UpdateQuantity { id, qty, resp }).await
    }

    /// See [`CartStore::clear_cart`].
    pub async fn clear_cart(&self) -> Result<(), RuntimeError> {
        self.call(|resp| Command::Clear { resp }).await
    }

    /// Whether a line exists for `id`.
    pub async fn is_in_cart(&self, id: ProductId) -> Result<bool, RuntimeError> {
        self.call(|resp| Command::IsInCart { id, resp }).await
    }

    /// Current lines in insertion order.
    pub async fn lines(&self) -> Result<Vec<CartLine>, RuntimeError> {
        self.call(|resp| Command::Lines { resp }).await
    }

    /// Current item and price totals.
    pub async fn totals(&self) -> Result<CartTotals, RuntimeError> {
        self.call(|resp| Command::Totals { resp }).await
    }

    /// Stops the loop and detaches it from storage change notifications.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.call(|resp| Command::Shutdown { resp }).await
    }

    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

enum Flow {
    Continue,
    Stop(oneshot::Sender<()>),
}

fn handle_command<S: KeyValueStore>(
    cmd: Command,
    store: &mut CartStore<S>,
    events_tx: &broadcast::Sender<CartEvent>,
) -> Flow {
    match cmd {
        Command::Add { product, qty, resp } => {
            let quantity = store.add_to_cart(&product, qty);
            let _ = events_tx.send(CartEvent::Added {
                id: product.id,
                quantity,
            });
            let _ = resp.send(quantity);
        }
        Command::Remove { id, resp } => {
            let removed = store.remove_from_cart(id);
            if removed {
                let _ = events_tx.send(CartEvent::Removed { id });
            }
            let _ = resp.send(removed);
        }
        Command::UpdateQuantity { id, qty, resp } => {
            let stored = store.update_quantity(id, qty);
            if let Some(quantity) = stored {
                let _ = events_tx.send(CartEvent::QuantityUpdated { id, quantity });
            }
            let _ = resp.send(stored);
        }
        Command::Clear { resp } => {
            store.clear_cart();
            let _ = events_tx.send(CartEvent::Cleared);
            let _ = resp.send(());
        }
        Command::IsInCart { id, resp } => {
            let _ = resp.send(store.is_in_cart(id));
        }
        Command::Lines { resp } => {
            let _ = resp.send(store.snapshot());
        }
        Command::Totals { resp } => {
            let _ = resp.send(store.totals());
        }
        Command::Shutdown { resp } => return Flow::Stop(resp),
    }

    Flow::Continue
}
