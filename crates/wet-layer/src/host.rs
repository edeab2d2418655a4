//! Host locale primitives used on the fallback path

use crate::model::Language;
use crate::resolver::{resolve, Resolution};
use crate::substitutions::Substitutions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One candidate language of a detection result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// Language tag
    pub language: String,
    /// Share of the text in this language, 0 to 100
    pub percentage: u8,
}

/// Result of a host language detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetection {
    /// Whether the host trusts the result
    pub is_reliable: bool,
    /// Candidates, most likely first
    pub languages: Vec<DetectedLanguage>,
}

/// Native locale facilities of the host platform
///
/// The layer answers from its override when it can and delegates everything
/// else here, verbatim.
#[async_trait]
pub trait LocaleHost: Send + Sync {
    /// Look up a message in the host's built-in catalog
    fn lookup_message(&self, key: &str, substitutions: Option<&Substitutions>) -> String;

    /// The host's UI language
    fn ui_language(&self) -> String;

    /// Languages the user accepts, most preferred first
    async fn accept_languages(&self) -> Vec<String>;

    /// Detect the language of `text`
    async fn detect_language(&self, text: &str) -> LanguageDetection;
}

/// A [`LocaleHost`] backed by a bundled default [`Language`]
///
/// Lookups use the same placeholder rules as the override and yield an empty
/// string for unknown keys. Detection is not supported and reports an
/// unreliable, empty result.
#[derive(Debug, Clone)]
pub struct CatalogHost {
    catalog: Option<Language>,
    ui_language: String,
    accept_languages: Vec<String>,
}

impl CatalogHost {
    /// Create a host without a catalog
    pub fn new(ui_language: impl Into<String>) -> Self {
        let ui_language = ui_language.into();
        Self {
            catalog: None,
            accept_languages: vec![ui_language.clone()],
            ui_language,
        }
    }

    /// Use `catalog` for lookups
    #[must_use]
    pub fn with_catalog(mut self, catalog: Language) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Report `languages` as accepted
    #[must_use]
    pub fn with_accept_languages(mut self, languages: Vec<String>) -> Self {
        self.accept_languages = languages;
        self
    }

    /// The bundled catalog, if any
    pub const fn catalog(&self) -> Option<&Language> {
        self.catalog.as_ref()
    }
}

#[async_trait]
impl LocaleHost for CatalogHost {
    fn lookup_message(&self, key: &str, substitutions: Option<&Substitutions>) -> String {
        let Some(catalog) = &self.catalog else {
            return String::new();
        };
        match resolve(&catalog.messages_by_key, key, substitutions) {
            Resolution::Text(text) => text.into_owned(),
            Resolution::Fallback => {
                debug!("Message '{}' missing from host catalog", key);
                String::new()
            }
        }
    }

    fn ui_language(&self) -> String {
        self.ui_language.clone()
    }

    async fn accept_languages(&self) -> Vec<String> {
        self.accept_languages.clone()
    }

    async fn detect_language(&self, _text: &str) -> LanguageDetection {
        LanguageDetection::default()
    }
}
