//! # WET Layer
//!
//! Runtime message localization with live language overrides.
//!
//! Messages are looked up by key in the active override (a full
//! [`Language`] pushed at runtime and persisted in a [`KeyValueStore`]); keys
//! the override does not cover are delegated to the host's own catalog
//! through [`LocaleHost`]. Observers register listeners to be told when the
//! active language changes.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wet_layer::{
//!     CatalogHost, Language, LayerOptions, MemoryStore, Message, Placeholder, WetLayer,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Arc::new(CatalogHost::new("en"));
//! let store = Arc::new(MemoryStore::new());
//! let layer = WetLayer::new(host, store, LayerOptions::default())?;
//! layer.ready().await;
//!
//! layer.apply_language(Language::new(
//!     "de",
//!     "Deutsch",
//!     vec![Message::new("greeting", "Hallo $NAME$")
//!         .with_placeholder(Placeholder::new("name", "$1"))],
//! ));
//!
//! assert_eq!(layer.get_message("greeting", Some(&"Welt".into())), "Hallo Welt");
//! assert_eq!(layer.ui_language(), "de");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod events;
pub mod host;
pub mod layer;
pub mod model;
pub mod notifier;
pub mod persistence;
pub mod placeholder;
pub mod resolver;
pub mod state;
pub mod storage;
pub mod substitutions;

pub use error::{LayerError, LayerResult, StorageError, StorageResult};
pub use events::{channel, EventReceiver, EventSender, InboundMessage};
pub use host::{CatalogHost, DetectedLanguage, LanguageDetection, LocaleHost};
pub use layer::{LayerOptions, WetLayer, DEFAULT_APPLY_ACTION};
pub use model::{Language, Message, MessageKind, MessageMap, Placeholder};
pub use notifier::{listener, Listener, Notifier};
pub use persistence::StorageKeys;
pub use resolver::{resolve, Resolution};
pub use state::OverrideState;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StoreItems};
pub use substitutions::Substitutions;
