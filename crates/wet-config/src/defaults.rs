//! Default values.

use crate::schema::*;
use wet_common::LoggingConfig;

/// Default storage key for the active locale.
pub const DEFAULT_LOCALE_KEY: &str = "wet-locale";

/// Default storage key for the message map.
pub const DEFAULT_MAP_KEY: &str = "wet-map";

/// Default action name of an apply-language event.
pub const DEFAULT_APPLY_ACTION: &str = "apply-language";

/// Default host UI language.
pub const DEFAULT_UI_LANGUAGE: &str = "en";

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            events: EventsConfig::default(),
            host: HostConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            locale_key: DEFAULT_LOCALE_KEY.to_string(),
            map_key: DEFAULT_MAP_KEY.to_string(),
            path: None,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            apply_action: DEFAULT_APPLY_ACTION.to_string(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            ui_language: DEFAULT_UI_LANGUAGE.to_string(),
            accept_languages: vec![DEFAULT_UI_LANGUAGE.to_string()],
            catalog_path: None,
        }
    }
}
