//! The localization layer facade

use crate::events::{EventReceiver, InboundMessage};
use crate::host::{LanguageDetection, LocaleHost};
use crate::model::{Language, Message};
use crate::notifier::{Listener, Notifier};
use crate::persistence::{load_state, PersistenceWriter, StorageKeys};
use crate::resolver::{resolve, Resolution};
use crate::state::{OverrideState, StateStore};
use crate::storage::KeyValueStore;
use crate::substitutions::Substitutions;
use crate::LayerResult;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Action name of inbound messages that apply a language
pub const DEFAULT_APPLY_ACTION: &str = "apply-language";

/// Construction options for [`WetLayer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOptions {
    /// Names of the persisted entries
    pub keys: StorageKeys,
    /// Inbound action that applies a language
    pub apply_action: String,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            apply_action: DEFAULT_APPLY_ACTION.to_string(),
        }
    }
}

/// Message resolution with a live, persisted language override
///
/// Construct one per process and share the returned `Arc`. Every operation
/// except the initial load is synchronous; lookups made before the load
/// finishes see no override and go to the host.
pub struct WetLayer {
    host: Arc<dyn LocaleHost>,
    state: StateStore,
    notifier: Notifier,
    writer: PersistenceWriter,
    apply_action: String,
    runtime: Handle,
    ready: watch::Sender<bool>,
    // Keeps state swaps and their queued writes in the same order
    transition: Mutex<()>,
}

impl WetLayer {
    /// Create the layer and start loading the persisted override
    ///
    /// Must be called from within a tokio runtime; the writer and the
    /// initial load run as tasks on it.
    pub fn new(
        host: Arc<dyn LocaleHost>,
        store: Arc<dyn KeyValueStore>,
        options: LayerOptions,
    ) -> LayerResult<Arc<Self>> {
        let runtime = Handle::try_current()?;
        let LayerOptions { keys, apply_action } = options;

        let (writer, _writer_task) =
            PersistenceWriter::spawn(Arc::clone(&store), keys.clone(), &runtime);
        let (ready, _) = watch::channel(false);

        let layer = Arc::new(Self {
            host,
            state: StateStore::new(),
            notifier: Notifier::new(),
            writer,
            apply_action,
            runtime: runtime.clone(),
            ready,
            transition: Mutex::new(()),
        });

        let generation = layer.state.generation();
        runtime.spawn(initialize(Arc::downgrade(&layer), store, keys, generation));

        info!(
            "Localization layer created (apply action '{}')",
            layer.apply_action
        );
        Ok(layer)
    }

    /// Wait for the initial load to finish
    ///
    /// Never returns if the store never answers.
    pub async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Whether the initial load has finished
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Make `language` the active override
    ///
    /// The new state is visible to lookups before the write is queued and
    /// before any listener runs. Persistence failures are logged, never
    /// returned.
    pub fn apply_language(&self, language: Language) {
        let state = Arc::new(OverrideState::from_language(language));
        info!(
            "Applying language override '{}' ({} message(s))",
            state.locale,
            state.messages.len()
        );

        {
            let _guard = self.transition.lock();
            self.state.replace(Arc::clone(&state));
            self.writer.save(&state);
        }
        self.notifier.notify_all();
    }

    /// Drop the override and return to host behavior
    pub fn reset(&self) {
        info!("Resetting language override");
        {
            let _guard = self.transition.lock();
            self.state.replace(Arc::new(OverrideState::default()));
            self.writer.clear();
        }
        self.notifier.notify_all();
    }

    /// Resolve `key` to display text
    ///
    /// Keys the override does not cover are answered by the host verbatim.
    pub fn get_message(&self, key: &str, substitutions: Option<&Substitutions>) -> String {
        let state = self.state.load();
        match resolve(&state.messages, key, substitutions) {
            Resolution::Text(text) => text.into_owned(),
            Resolution::Fallback => self.host.lookup_message(key, substitutions),
        }
    }

    /// The override's entry for `key`, if any
    pub fn message(&self, key: &str) -> Option<Message> {
        self.state.load().messages.get(key).cloned()
    }

    /// The active locale, or the host's UI language without an override
    pub fn ui_language(&self) -> String {
        let state = self.state.load();
        state
            .active_locale()
            .map_or_else(|| self.host.ui_language(), str::to_owned)
    }

    /// The active override locale, if any
    pub fn active_locale(&self) -> Option<String> {
        self.state.load().active_locale().map(str::to_owned)
    }

    /// Current override state
    pub fn snapshot(&self) -> Arc<OverrideState> {
        self.state.snapshot()
    }

    /// Languages the user accepts, as reported by the host
    pub async fn accept_languages(&self) -> Vec<String> {
        self.host.accept_languages().await
    }

    /// Detect the language of `text` using the host
    pub async fn detect_language(&self, text: &str) -> LanguageDetection {
        self.host.detect_language(text).await
    }

    /// Register a change listener; see [`Notifier::add`]
    pub fn add_listener(&self, listener: Listener) -> bool {
        self.notifier.add(listener)
    }

    /// Unregister a change listener; see [`Notifier::remove`]
    pub fn remove_listener(&self, listener: &Listener) -> bool {
        self.notifier.remove(listener)
    }

    /// React to one inbound message
    ///
    /// Returns `true` when it applied a language.
    pub fn handle_message(&self, message: InboundMessage) -> bool {
        if message.action != self.apply_action {
            debug!("Ignoring inbound action '{}'", message.action);
            return false;
        }

        let Some(language) = message.language else {
            warn!("Inbound '{}' message carried no language", message.action);
            return false;
        };

        self.apply_language(language);
        true
    }

    /// Consume inbound messages from `events` until the channel closes
    ///
    /// The task holds only a weak reference and stops once the layer is
    /// dropped.
    pub fn subscribe(self: &Arc<Self>, mut events: EventReceiver) -> JoinHandle<()> {
        let layer = Arc::downgrade(self);
        self.runtime.spawn(async move {
            while let Some(message) = events.recv().await {
                let Some(layer) = layer.upgrade() else {
                    break;
                };
                layer.handle_message(message);
            }
            debug!("Inbound event channel closed");
        })
    }

    /// Wait until every persistence write issued so far has been attempted
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

impl fmt::Debug for WetLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load();
        f.debug_struct("WetLayer")
            .field("locale", &state.locale)
            .field("messages", &state.messages.len())
            .field("listeners", &self.notifier.len())
            .field("apply_action", &self.apply_action)
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

async fn initialize(
    layer: Weak<WetLayer>,
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    generation: u64,
) {
    let state = load_state(&*store, &keys).await;
    let Some(layer) = layer.upgrade() else {
        return;
    };

    if layer.state.replace_if_generation(Arc::new(state), generation) {
        debug!("Initial override state installed");
    } else {
        debug!("Override changed while loading, keeping the newer state");
    }

    layer.ready.send_replace(true);
    layer.notifier.notify_all();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CatalogHost;
    use crate::storage::MemoryStore;

    fn layer() -> Arc<WetLayer> {
        WetLayer::new(
            Arc::new(CatalogHost::new("en")),
            Arc::new(MemoryStore::new()),
            LayerOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_runtime() {
        let result = WetLayer::new(
            Arc::new(CatalogHost::new("en")),
            Arc::new(MemoryStore::new()),
            LayerOptions::default(),
        );
        assert!(matches!(result, Err(crate::LayerError::NoRuntime(_))));
    }

    #[tokio::test]
    async fn test_becomes_ready() {
        let layer = layer();
        layer.ready().await;
        assert!(layer.is_ready());
        assert!(layer.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_other_actions_are_ignored() {
        let layer = layer();
        layer.ready().await;

        let language = Language::new("fr", "Français", vec![Message::new("yes", "Oui")]);
        assert!(!layer.handle_message(InboundMessage::apply_language("refresh", language.clone())));
        assert!(!layer.handle_message(InboundMessage {
            action: DEFAULT_APPLY_ACTION.to_string(),
            language: None,
        }));
        assert_eq!(layer.active_locale(), None);

        assert!(layer.handle_message(InboundMessage::apply_language(
            DEFAULT_APPLY_ACTION,
            language
        )));
        assert_eq!(layer.active_locale().as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_inbound_index_is_installed_as_sent() {
        let layer = layer();
        layer.ready().await;

        let message: InboundMessage = serde_json::from_str(
            r#"{
                "action": "apply-language",
                "language": {
                    "locale": "es",
                    "label": "Español",
                    "messages": [{"type": 2, "name": "hello", "message": "Hola"}],
                    "messagesByKey": {}
                }
            }"#,
        )
        .unwrap();
        assert!(layer.handle_message(message));

        let state = layer.snapshot();
        assert_eq!(state.locale, "es");
        assert!(state.messages.is_empty());
        assert_eq!(layer.message("hello"), None);
        assert_eq!(layer.get_message("hello", None), "");
    }

    #[tokio::test]
    async fn test_custom_apply_action() {
        let layer = WetLayer::new(
            Arc::new(CatalogHost::new("en")),
            Arc::new(MemoryStore::new()),
            LayerOptions {
                apply_action: "set-locale".to_string(),
                ..LayerOptions::default()
            },
        )
        .unwrap();
        layer.ready().await;

        let language = Language::new("pt", "Português", vec![]);
        assert!(!layer.handle_message(InboundMessage::apply_language(
            DEFAULT_APPLY_ACTION,
            language.clone()
        )));
        assert!(layer.handle_message(InboundMessage::apply_language("set-locale", language)));
    }
}
