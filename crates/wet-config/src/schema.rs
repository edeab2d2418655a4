//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use wet_common::LoggingConfig;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Durable storage configuration.
    pub storage: StorageConfig,
    /// Inbound event configuration.
    pub events: EventsConfig,
    /// Host locale configuration.
    pub host: HostConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Durable storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key holding the active locale identifier.
    pub locale_key: String,
    /// Key holding the serialized message map.
    pub map_key: String,
    /// File backing the durable store. `None` keeps state in memory only.
    pub path: Option<PathBuf>,
}

/// Inbound event configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Action name that carries a language to apply.
    pub apply_action: String,
}

/// Host locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// UI language reported when no override is active.
    pub ui_language: String,
    /// Languages reported as accepted by the user.
    pub accept_languages: Vec<String>,
    /// Bundled default language, as a JSON `Language` document.
    pub catalog_path: Option<PathBuf>,
}
