//! Message catalog data model
//!
//! The serialized shape matches what other contexts send and what is kept in
//! durable storage: messages use the field names `type` (an integer kind) and
//! `message` (the text), languages carry `messagesByKey` next to the ordered
//! message list.

use crate::error::{LayerError, LayerResult, UnknownMessageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Messages indexed by name
pub type MessageMap = HashMap<String, Message>;

/// Kind of a catalog entry
///
/// Only [`MessageKind::Message`] entries carry resolvable text. Groups and
/// comments organize a catalog and are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageKind {
    /// Heading that groups the entries after it
    Group,
    /// Free-form authoring note
    Comment,
    /// Localized text
    #[default]
    Message,
}

impl From<MessageKind> for u8 {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Group => 0,
            MessageKind::Comment => 1,
            MessageKind::Message => 2,
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = UnknownMessageKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Group),
            1 => Ok(Self::Comment),
            2 => Ok(Self::Message),
            other => Err(UnknownMessageKind(other)),
        }
    }
}

/// A named substitution slot inside a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Token name, matched case-insensitively
    pub name: String,
    /// Literal replacement, or a positional reference such as `$1`
    #[serde(default)]
    pub content: String,
    /// Documentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Placeholder {
    /// Create a placeholder
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            example: None,
        }
    }

    /// Attach an example value
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// A unit of localized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Entry kind
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Unique key within a language
    pub name: String,
    /// Raw text, possibly containing `$token$` placeholders
    #[serde(rename = "message", default)]
    pub text: String,
    /// Authoring metadata, unused at resolution time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Placeholders scoped to this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<Vec<Placeholder>>,
    /// Opaque content fingerprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Message {
    /// Create a resolvable message
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Message,
            name: name.into(),
            text: text.into(),
            description: None,
            placeholders: None,
            hash: None,
        }
    }

    /// Create a group heading
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Group,
            ..Self::new(name, "")
        }
    }

    /// Create an authoring comment
    pub fn comment(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Comment,
            ..Self::new(name, text)
        }
    }

    /// Append a placeholder definition
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholders.get_or_insert_with(Vec::new).push(placeholder);
        self
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a content hash
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Whether this entry can produce text at resolution time
    pub fn is_resolvable(&self) -> bool {
        self.kind == MessageKind::Message && !self.text.is_empty()
    }
}

/// A full catalog for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Locale identifier, e.g. `de` or `pt-BR`
    pub locale: String,
    /// Human-readable name
    pub label: String,
    /// Entries in catalog order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Resolvable messages indexed by name
    #[serde(default)]
    pub messages_by_key: MessageMap,
}

impl Language {
    /// Create a language and index its messages
    pub fn new(locale: impl Into<String>, label: impl Into<String>, messages: Vec<Message>) -> Self {
        let mut language = Self {
            locale: locale.into(),
            label: label.into(),
            messages,
            messages_by_key: MessageMap::new(),
        };
        language.reindex();
        language
    }

    /// Decode a language document, building the index when it is absent
    pub fn from_json(json: &str) -> LayerResult<Self> {
        let mut language: Self = serde_json::from_str(json)?;
        if language.messages_by_key.is_empty() {
            language.reindex();
        }
        Ok(language)
    }

    /// Rebuild `messages_by_key` from `messages`
    ///
    /// Only [`MessageKind::Message`] entries are indexed. A repeated name
    /// replaces the earlier entry.
    pub fn reindex(&mut self) {
        self.messages_by_key.clear();
        for message in self.messages.iter().filter(|m| m.kind == MessageKind::Message) {
            if let Some(previous) =
                self.messages_by_key.insert(message.name.clone(), message.clone())
            {
                warn!(
                    "Duplicate message '{}' in locale {}, keeping the later entry",
                    previous.name, self.locale
                );
            }
        }
    }

    /// Look up a message by name
    pub fn get(&self, name: &str) -> Option<&Message> {
        self.messages_by_key.get(name)
    }

    /// Parse the locale as a language identifier
    pub fn language_identifier(&self) -> LayerResult<LanguageIdentifier> {
        self.locale
            .parse()
            .map_err(|e: unic_langid::LanguageIdentifierError| LayerError::InvalidLocale {
                locale: self.locale.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_format() {
        let message = Message::new("greeting", "Hello $NAME$")
            .with_placeholder(Placeholder::new("NAME", "$1").with_example("World"));

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "type": 2,
                "name": "greeting",
                "message": "Hello $NAME$",
                "placeholders": [{"name": "NAME", "content": "$1", "example": "World"}]
            })
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = serde_json::from_value::<Message>(json!({"type": 7, "name": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_defaults_to_message() {
        let message: Message = serde_json::from_value(json!({"name": "x", "message": "y"})).unwrap();
        assert_eq!(message.kind, MessageKind::Message);
        assert!(message.is_resolvable());
    }

    #[test]
    fn test_language_index_skips_groups_and_comments() {
        let language = Language::new(
            "fr",
            "Français",
            vec![
                Message::group("General"),
                Message::comment("note", "Keep it short"),
                Message::new("ok", "D'accord"),
            ],
        );

        assert_eq!(language.messages.len(), 3);
        assert_eq!(language.messages_by_key.len(), 1);
        assert_eq!(language.get("ok").unwrap().text, "D'accord");
        assert!(language.get("note").is_none());
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let language = Language::new(
            "en",
            "English",
            vec![Message::new("a", "first"), Message::new("a", "second")],
        );
        assert_eq!(language.get("a").unwrap().text, "second");
    }

    #[test]
    fn test_from_json_builds_missing_index() {
        let language = Language::from_json(
            r#"{"locale": "es", "label": "Español", "messages": [{"type": 2, "name": "hi", "message": "Hola"}]}"#,
        )
        .unwrap();
        assert_eq!(language.get("hi").unwrap().text, "Hola");
    }

    #[test]
    fn test_from_json_keeps_given_index() {
        let language = Language::from_json(
            r#"{"locale": "es", "label": "Español", "messages": [],
                "messagesByKey": {"hi": {"type": 2, "name": "hi", "message": "Hola"}}}"#,
        )
        .unwrap();
        assert!(language.messages.is_empty());
        assert_eq!(language.get("hi").unwrap().text, "Hola");
    }

    #[test]
    fn test_language_identifier() {
        let language = Language::new("pt-BR", "Português", Vec::new());
        assert_eq!(language.language_identifier().unwrap().to_string(), "pt-BR");

        let bad = Language::new("not a locale", "?", Vec::new());
        assert!(matches!(
            bad.language_identifier(),
            Err(LayerError::InvalidLocale { .. })
        ));
    }
}
