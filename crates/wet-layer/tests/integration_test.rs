//! Integration tests for wet-layer crate.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wet_common::test_utils::init_test_logging;
use wet_layer::{
    channel, listener, InboundMessage, KeyValueStore, Language, LanguageDetection, LayerOptions,
    Listener, LocaleHost, MemoryStore, Message, Placeholder, StorageError, StorageResult,
    StoreItems, Substitutions, WetLayer, DEFAULT_APPLY_ACTION,
};

/// Host that answers every lookup with a recognizable string and records it
#[derive(Default)]
struct RecordingHost {
    lookups: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingHost {
    fn lookups(&self) -> Vec<(String, Vec<String>)> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl LocaleHost for RecordingHost {
    fn lookup_message(&self, key: &str, substitutions: Option<&Substitutions>) -> String {
        let values = substitutions.map(|s| s.as_slice().to_vec()).unwrap_or_default();
        self.lookups.lock().push((key.to_string(), values.clone()));
        if values.is_empty() {
            format!("host:{key}")
        } else {
            format!("host:{key}:{}", values.join(","))
        }
    }

    fn ui_language(&self) -> String {
        "en-US".to_string()
    }

    async fn accept_languages(&self) -> Vec<String> {
        vec!["en-US".to_string(), "fr".to_string()]
    }

    async fn detect_language(&self, text: &str) -> LanguageDetection {
        LanguageDetection {
            is_reliable: !text.is_empty(),
            languages: Vec::new(),
        }
    }
}

/// Store whose reads never complete
struct PendingStore;

#[async_trait]
impl KeyValueStore for PendingStore {
    async fn get(&self, _keys: &[&str]) -> StorageResult<StoreItems> {
        std::future::pending().await
    }

    async fn set(&self, _items: StoreItems) -> StorageResult<()> {
        Ok(())
    }

    async fn remove(&self, _keys: &[&str]) -> StorageResult<()> {
        Ok(())
    }
}

/// Store that fails every operation
struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _keys: &[&str]) -> StorageResult<StoreItems> {
        Err(StorageError::Backend("quota exceeded".to_string()))
    }

    async fn set(&self, _items: StoreItems) -> StorageResult<()> {
        Err(StorageError::Backend("quota exceeded".to_string()))
    }

    async fn remove(&self, _keys: &[&str]) -> StorageResult<()> {
        Err(StorageError::Backend("quota exceeded".to_string()))
    }
}

fn german() -> Language {
    Language::new(
        "de",
        "Deutsch",
        vec![
            Message::new("hello", "Hallo $WHO$").with_placeholder(Placeholder::new("who", "$1")),
            Message::new("plain", "Kosten: $PRICE$"),
            Message::new("brand", "Willkommen bei $Product$")
                .with_placeholder(Placeholder::new("PRODUCT", "WET")),
            Message::new("missing_ref", "Hallo $WHO$")
                .with_placeholder(Placeholder::new("who", "$2")),
            Message::new("unknown", "Hallo $UNKNOWN$")
                .with_placeholder(Placeholder::new("who", "$1")),
            Message::new("empty", ""),
        ],
    )
}

fn counting_listener() -> (Arc<AtomicUsize>, Listener) {
    let count = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&count);
    let l = listener(move || {
        hits.fetch_add(1, Ordering::SeqCst);
    });
    (count, l)
}

async fn ready_layer(host: Arc<RecordingHost>, store: Arc<dyn KeyValueStore>) -> Arc<WetLayer> {
    init_test_logging();
    let layer = WetLayer::new(host, store, LayerOptions::default()).unwrap();
    layer.ready().await;
    layer
}

#[tokio::test]
async fn test_lookups_fall_back_before_initialization() {
    init_test_logging();
    let host = Arc::new(RecordingHost::default());
    let layer = WetLayer::new(host.clone(), Arc::new(PendingStore), LayerOptions::default())
        .unwrap();

    assert_eq!(layer.get_message("hello", Some(&"World".into())), "host:hello:World");
    assert_eq!(layer.ui_language(), "en-US");
    assert_eq!(
        host.lookups(),
        vec![("hello".to_string(), vec!["World".to_string()])]
    );

    let waited = tokio::time::timeout(Duration::from_millis(50), layer.ready()).await;
    assert!(waited.is_err());
    assert!(!layer.is_ready());
}

#[tokio::test]
async fn test_apply_works_while_load_never_finishes() {
    init_test_logging();
    let layer = WetLayer::new(
        Arc::new(RecordingHost::default()),
        Arc::new(PendingStore),
        LayerOptions::default(),
    )
    .unwrap();

    layer.apply_language(german());
    assert_eq!(layer.get_message("hello", Some(&"Welt".into())), "Hallo Welt");
}

#[tokio::test]
async fn test_placeholder_resolution() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    layer.apply_language(german());

    assert_eq!(layer.get_message("hello", Some(&"World".into())), "Hallo World");
    assert_eq!(
        layer.get_message("hello", Some(&vec!["World", "ignored"].into())),
        "Hallo World"
    );
    assert_eq!(layer.get_message("brand", Some(&"x".into())), "Willkommen bei WET");
    assert_eq!(layer.get_message("missing_ref", Some(&"World".into())), "Hallo $2");
    assert_eq!(layer.get_message("unknown", Some(&"World".into())), "Hallo $UNKNOWN$");
}

#[tokio::test]
async fn test_raw_text_without_scanning() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    layer.apply_language(german());

    assert_eq!(layer.get_message("hello", None), "Hallo $WHO$");
    assert_eq!(layer.get_message("plain", Some(&"5".into())), "Kosten: $PRICE$");
    assert_eq!(layer.get_message("plain", None), "Kosten: $PRICE$");
}

#[tokio::test]
async fn test_missing_and_empty_messages_fall_back() {
    let host = Arc::new(RecordingHost::default());
    let layer = ready_layer(host.clone(), Arc::new(MemoryStore::new())).await;
    layer.apply_language(german());

    assert_eq!(layer.get_message("absent", None), "host:absent");
    assert_eq!(layer.get_message("empty", Some(&["a", "b"].into())), "host:empty:a,b");
    assert_eq!(host.lookups().len(), 2);
}

#[tokio::test]
async fn test_listeners_fire_on_load_apply_and_reset() {
    init_test_logging();
    let layer = WetLayer::new(
        Arc::new(RecordingHost::default()),
        Arc::new(MemoryStore::new()),
        LayerOptions::default(),
    )
    .unwrap();
    let (count, l) = counting_listener();
    layer.add_listener(l);

    layer.ready().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    layer.apply_language(german());
    assert_eq!(count.load(Ordering::SeqCst), 2);

    layer.reset();
    layer.reset();
    assert_eq!(count.load(Ordering::SeqCst), 4);
    assert!(layer.snapshot().is_empty());
}

#[tokio::test]
async fn test_listener_sees_new_state() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    let seen = Arc::new(Mutex::new(Vec::new()));

    let observer = Arc::downgrade(&layer);
    let record = Arc::clone(&seen);
    layer.add_listener(listener(move || {
        if let Some(layer) = observer.upgrade() {
            record.lock().push(layer.ui_language());
        }
    }));

    layer.apply_language(german());
    layer.reset();

    assert_eq!(*seen.lock(), vec!["de".to_string(), "en-US".to_string()]);
}

#[tokio::test]
async fn test_listener_registration_semantics() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    let (count, l) = counting_listener();
    let (sibling_count, sibling) = counting_listener();

    assert!(layer.add_listener(Arc::clone(&l)));
    assert!(!layer.add_listener(Arc::clone(&l)));
    layer.add_listener(listener(|| panic!("broken listener")));
    layer.add_listener(sibling);

    layer.reset();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(sibling_count.load(Ordering::SeqCst), 1);

    assert!(layer.remove_listener(&l));
    assert!(!layer.remove_listener(&l));
    layer.reset();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(sibling_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_ui_language_follows_override() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;

    assert_eq!(layer.ui_language(), "en-US");
    layer.apply_language(german());
    assert_eq!(layer.ui_language(), "de");
    layer.reset();
    assert_eq!(layer.ui_language(), "en-US");
}

#[tokio::test]
async fn test_ambient_accessors_delegate() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    layer.apply_language(german());

    assert_eq!(layer.accept_languages().await, vec!["en-US", "fr"]);
    assert!(layer.detect_language("Guten Tag").await.is_reliable);
}

#[tokio::test]
async fn test_override_persists_across_instances() {
    let store = Arc::new(MemoryStore::new());

    let first = ready_layer(Arc::new(RecordingHost::default()), store.clone()).await;
    first.apply_language(german());
    first.flush().await;

    let raw = store.snapshot();
    assert_eq!(raw["wet-locale"], json!("de"));
    assert_eq!(raw["wet-map"]["hello"]["message"], json!("Hallo $WHO$"));

    let second = ready_layer(Arc::new(RecordingHost::default()), store.clone()).await;
    assert_eq!(second.ui_language(), "de");
    assert_eq!(second.get_message("hello", Some(&"Welt".into())), "Hallo Welt");

    second.reset();
    second.flush().await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_initial_load_does_not_override_newer_apply() {
    init_test_logging();
    let store = Arc::new(MemoryStore::with_items(StoreItems::from([
        ("wet-locale".to_string(), json!("it")),
        ("wet-map".to_string(), json!({})),
    ])));
    let layer = WetLayer::new(
        Arc::new(RecordingHost::default()),
        store,
        LayerOptions::default(),
    )
    .unwrap();

    layer.apply_language(german());
    layer.ready().await;

    assert_eq!(layer.active_locale().as_deref(), Some("de"));
}

#[tokio::test]
async fn test_storage_failures_are_not_surfaced() {
    let host = Arc::new(RecordingHost::default());
    let layer = ready_layer(host, Arc::new(FailingStore)).await;
    assert!(layer.snapshot().is_empty());

    layer.apply_language(german());
    layer.flush().await;
    assert_eq!(layer.get_message("hello", Some(&"Welt".into())), "Hallo Welt");

    layer.reset();
    layer.flush().await;
    assert_eq!(layer.get_message("hello", None), "host:hello");
}

#[tokio::test]
async fn test_inbound_channel_applies_language() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;
    let (count, l) = counting_listener();
    layer.add_listener(l);

    let (tx, rx) = channel();
    let task = layer.subscribe(rx);

    tx.send(InboundMessage {
        action: "something-else".to_string(),
        language: Some(german()),
    })
    .unwrap();
    tx.send(InboundMessage::apply_language(DEFAULT_APPLY_ACTION, german()))
        .unwrap();
    drop(tx);
    task.await.unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(layer.ui_language(), "de");
}

#[tokio::test]
async fn test_inbound_message_from_wire() {
    let layer = ready_layer(Arc::new(RecordingHost::default()), Arc::new(MemoryStore::new())).await;

    let message: InboundMessage = serde_json::from_value(json!({
        "action": "apply-language",
        "language": {
            "locale": "es",
            "label": "Español",
            "messages": [],
            "messagesByKey": {
                "hello": {
                    "type": 2,
                    "name": "hello",
                    "message": "Hola $WHO$",
                    "placeholders": [{"name": "who", "content": "$1"}]
                }
            }
        }
    }))
    .unwrap();

    assert!(layer.handle_message(message));
    assert_eq!(layer.get_message("hello", Some(&"Mundo".into())), "Hola Mundo");
}
