//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use unic_langid::LanguageIdentifier;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config.validate()
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.locale_key.trim().is_empty() {
            return Err(ConfigError::validation("storage.locale_key", "cannot be empty"));
        }

        if self.storage.map_key.trim().is_empty() {
            return Err(ConfigError::validation("storage.map_key", "cannot be empty"));
        }

        if self.storage.locale_key == self.storage.map_key {
            return Err(ConfigError::validation(
                "storage.map_key",
                "must differ from storage.locale_key",
            ));
        }

        if self.events.apply_action.trim().is_empty() {
            return Err(ConfigError::validation("events.apply_action", "cannot be empty"));
        }

        validate_language_tag("host.ui_language", &self.host.ui_language)?;
        for tag in &self.host.accept_languages {
            validate_language_tag("host.accept_languages", tag)?;
        }

        Ok(())
    }
}

fn validate_language_tag(field: &str, tag: &str) -> Result<(), ConfigError> {
    tag.parse::<LanguageIdentifier>()
        .map(|_| ())
        .map_err(|e| ConfigError::validation(field, format!("invalid language tag '{tag}': {e}")))
}
