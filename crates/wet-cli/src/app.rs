//! Wiring from configuration to a running layer.

use crate::error::{CliError, CliResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use wet_common::init_logging;
use wet_config::{Config, ConfigLoader};
use wet_layer::{
    CatalogHost, JsonFileStore, KeyValueStore, Language, LayerOptions, MemoryStore, StorageKeys,
    WetLayer,
};

/// Load configuration and install the global log subscriber
///
/// Without `config_path` the loader's default search applies. `log_level`
/// replaces the configured level.
pub fn prepare(config_path: Option<&Path>, log_level: Option<String>) -> CliResult<Config> {
    let mut config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging)?;
    Ok(config)
}

/// Layer options described by `config`
pub fn layer_options(config: &Config) -> LayerOptions {
    LayerOptions {
        keys: StorageKeys::new(&config.storage.locale_key, &config.storage.map_key),
        apply_action: config.events.apply_action.clone(),
    }
}

/// Read a language document from `path`
pub fn read_language(path: &Path) -> CliResult<Language> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let language = Language::from_json(&content)?;
    language.language_identifier()?;
    Ok(language)
}

/// Host described by `config`, with its bundled catalog loaded
pub fn build_host(config: &Config) -> CliResult<CatalogHost> {
    let host = CatalogHost::new(&config.host.ui_language)
        .with_accept_languages(config.host.accept_languages.clone());

    match &config.host.catalog_path {
        Some(path) => {
            let catalog = read_language(path)?;
            info!(
                "Loaded host catalog '{}' with {} message(s)",
                catalog.locale,
                catalog.messages_by_key.len()
            );
            Ok(host.with_catalog(catalog))
        }
        None => Ok(host),
    }
}

/// Store described by `config`
pub fn build_store(config: &Config) -> Arc<dyn KeyValueStore> {
    if let Some(path) = &config.storage.path {
        info!("Persisting overrides to {:?}", path);
        Arc::new(JsonFileStore::new(path))
    } else {
        warn!("No storage path configured, overrides will not outlive this process");
        Arc::new(MemoryStore::new())
    }
}

/// Build the layer for `config` and wait for its persisted state
pub async fn build_layer(config: &Config) -> CliResult<Arc<WetLayer>> {
    let host = Arc::new(build_host(config)?);
    let layer = WetLayer::new(host, build_store(config), layer_options(config))?;
    layer.ready().await;
    Ok(layer)
}
