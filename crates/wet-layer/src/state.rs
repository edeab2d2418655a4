//! Active override state

use crate::model::{Language, MessageMap};
use arc_swap::{ArcSwap, Guard};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The active locale and its message map
///
/// An empty locale and map mean "no override": every lookup goes to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideState {
    /// Active locale identifier, empty when no override is active
    pub locale: String,
    /// Messages of the active override
    pub messages: MessageMap,
}

impl OverrideState {
    /// State for a freshly applied language
    pub fn from_language(language: Language) -> Self {
        Self {
            locale: language.locale,
            messages: language.messages_by_key,
        }
    }

    /// Whether neither a locale nor messages are set
    pub fn is_empty(&self) -> bool {
        self.locale.is_empty() && self.messages.is_empty()
    }

    /// The active locale, if any
    pub fn active_locale(&self) -> Option<&str> {
        (!self.locale.is_empty()).then_some(self.locale.as_str())
    }
}

/// Holder of the current [`OverrideState`]
///
/// Readers get a consistent snapshot without locking. Every replacement swaps
/// the whole state at once and advances a generation counter.
#[derive(Debug)]
pub struct StateStore {
    current: ArcSwap<OverrideState>,
    generation: AtomicU64,
    write_lock: Mutex<()>,
}

impl StateStore {
    /// Create a store holding the empty state
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(OverrideState::default()),
            generation: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    /// Borrow the current state
    pub fn load(&self) -> Guard<Arc<OverrideState>> {
        self.current.load()
    }

    /// Clone out the current state handle
    pub fn snapshot(&self) -> Arc<OverrideState> {
        self.current.load_full()
    }

    /// Number of replacements made so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the state
    pub fn replace(&self, state: Arc<OverrideState>) {
        let _guard = self.write_lock.lock();
        self.current.store(state);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Replace the state only if nothing replaced it since `generation`
    ///
    /// Returns `true` when the state was stored.
    pub fn replace_if_generation(&self, state: Arc<OverrideState>, generation: u64) -> bool {
        let _guard = self.write_lock.lock();
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        self.current.store(state);
        self.generation.fetch_add(1, Ordering::AcqRel);
        true
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
