//! Configuration loading from YAML files and environment variables.

use crate::schema::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "WET_CONFIG_PATH";

/// Configuration files probed, in order, when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["wet.yaml", "wet.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration field '{field}': {message}")]
    ValidationError {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error for a field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_from_file_with(path, |name| env::var(name).ok())
    }

    /// Load configuration from a YAML file, reading overrides through `lookup`
    pub fn load_from_file_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading configuration from {:?}", path.as_ref());
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_yaml_str(&content)?;

        Self::apply_overrides(&mut config, lookup);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from the environment and default file locations
    pub fn load() -> Result<Config, ConfigError> {
        if let Some(path) = Self::locate() {
            info!("Using configuration file {:?}", path);
            return Self::load_from_file(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration document without applying overrides
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) {
        Self::apply_overrides(config, |name| env::var(name).ok());
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name
    pub fn apply_overrides<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("WET_STORE_PATH") {
            config.storage.path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("WET_LOCALE_KEY") {
            config.storage.locale_key = key;
        }

        if let Some(key) = lookup("WET_MAP_KEY") {
            config.storage.map_key = key;
        }

        if let Some(action) = lookup("WET_APPLY_ACTION") {
            config.events.apply_action = action;
        }

        if let Some(language) = lookup("WET_UI_LANGUAGE") {
            config.host.ui_language = language;
        }

        if let Some(languages) = lookup("WET_ACCEPT_LANGUAGES") {
            config.host.accept_languages = languages
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(level) = lookup("WET_LOG_LEVEL") {
            config.logging.level = level;
        }
    }
}
