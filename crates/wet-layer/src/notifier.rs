//! Change listeners

use parking_lot::Mutex;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Callback fired after the active language state changes
///
/// Identity is the allocation: registering the same `Arc` twice is a no-op,
/// while two separately created closures are distinct listeners.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Wrap a closure as a [`Listener`]
pub fn listener<F>(f: F) -> Listener
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Ordered registry of listeners
#[derive(Default)]
pub struct Notifier {
    listeners: Mutex<Vec<Listener>>,
}

impl Notifier {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` unless it is already registered
    ///
    /// Returns `true` when the listener was added.
    pub fn add(&self, listener: Listener) -> bool {
        let mut listeners = self.listeners.lock();
        if listeners.iter().any(|existing| same_listener(existing, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Unregister `listener`
    ///
    /// Returns `true` when it was registered.
    pub fn remove(&self, listener: &Listener) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|existing| !same_listener(existing, listener));
        listeners.len() != before
    }

    /// Invoke every listener in registration order
    ///
    /// Listeners run on a snapshot of the registry taken before the first
    /// call, so registrations made while notifying apply to the next round.
    /// A panicking listener is logged and skipped. Returns the number of
    /// listeners that panicked.
    pub fn notify_all(&self) -> usize {
        let snapshot: Vec<Listener> = self.listeners.lock().clone();
        debug!("Notifying {} listener(s)", snapshot.len());

        let mut failures = 0;
        for (position, listener) in snapshot.iter().enumerate() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| listener())) {
                failures += 1;
                error!(
                    "Listener #{} panicked during notification: {}",
                    position,
                    panic_message(payload.as_ref())
                );
            }
        }
        failures
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
