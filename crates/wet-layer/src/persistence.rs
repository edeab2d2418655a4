//! Persistence of the override state
//!
//! Writes are fire-and-forget: callers enqueue an operation and move on. A
//! single writer task drains the queue in order, so the last apply or reset
//! always wins on disk, and failures are only logged. In-memory state stays
//! authoritative either way; a lost write only loses the override across a
//! restart.

use crate::model::MessageMap;
use crate::state::OverrideState;
use crate::storage::{KeyValueStore, StoreItems};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Names of the two persisted entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Entry holding the locale identifier
    pub locale: String,
    /// Entry holding the message map
    pub map: String,
}

impl StorageKeys {
    /// Create a key pair
    pub fn new(locale: impl Into<String>, map: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            map: map.into(),
        }
    }

    fn as_array(&self) -> [&str; 2] {
        [self.locale.as_str(), self.map.as_str()]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("wet-locale", "wet-map")
    }
}

#[derive(Debug)]
enum PersistOp {
    Save(StoreItems),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Queue of pending durable writes
#[derive(Debug)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<PersistOp>,
    keys: StorageKeys,
}

impl PersistenceWriter {
    /// Start the writer task on `runtime`
    pub fn spawn(
        store: Arc<dyn KeyValueStore>,
        keys: StorageKeys,
        runtime: &Handle,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = runtime.spawn(run_writer(store, keys.clone(), rx));
        (Self { tx, keys }, task)
    }

    /// Enqueue a write of `state`
    pub fn save(&self, state: &OverrideState) {
        let map = match serde_json::to_value(&state.messages) {
            Ok(map) => map,
            Err(e) => {
                warn!("Failed to encode message map for locale {}: {}", state.locale, e);
                return;
            }
        };

        let items = StoreItems::from([
            (self.keys.locale.clone(), Value::String(state.locale.clone())),
            (self.keys.map.clone(), map),
        ]);
        self.send(PersistOp::Save(items));
    }

    /// Enqueue removal of both entries
    pub fn clear(&self) {
        self.send(PersistOp::Clear);
    }

    /// Wait until every write enqueued so far has been attempted
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(PersistOp::Flush(done_tx));
        let _ = done_rx.await;
    }

    fn send(&self, op: PersistOp) {
        if self.tx.send(op).is_err() {
            warn!("Persistence writer has stopped, dropping write");
        }
    }
}

async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    mut rx: mpsc::UnboundedReceiver<PersistOp>,
) {
    while let Some(op) = rx.recv().await {
        match op {
            PersistOp::Save(items) => {
                if let Err(e) = store.set(items).await {
                    warn!("Failed to persist language override: {}", e);
                }
            }
            PersistOp::Clear => {
                if let Err(e) = store.remove(&keys.as_array()).await {
                    warn!("Failed to remove persisted language override: {}", e);
                }
            }
            PersistOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence writer finished");
}

/// Read the persisted override
///
/// Anything unreadable counts as "nothing persisted": a failed read yields
/// the empty state, a missing entry yields its empty default, and a map that
/// does not decode discards the whole override.
pub async fn load_state(store: &dyn KeyValueStore, keys: &StorageKeys) -> OverrideState {
    let mut items = match store.get(&keys.as_array()).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to read persisted language override: {}", e);
            return OverrideState::default();
        }
    };

    let locale = match items.remove(&keys.locale) {
        Some(Value::String(locale)) => locale,
        Some(Value::Null) | None => String::new(),
        Some(other) => {
            warn!("Ignoring persisted locale of unexpected type: {}", other);
            String::new()
        }
    };

    let messages = match items.remove(&keys.map) {
        Some(Value::Null) | None => MessageMap::new(),
        Some(value) => match serde_json::from_value::<MessageMap>(value) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Discarding unreadable persisted message map: {}", e);
                return OverrideState::default();
            }
        },
    };

    info!(
        "Loaded persisted override: locale '{}', {} message(s)",
        locale,
        messages.len()
    );
    OverrideState { locale, messages }
}
