//! Message resolution against an override map

use crate::model::MessageMap;
use crate::placeholder::expand;
use crate::substitutions::Substitutions;
use std::borrow::Cow;

/// Outcome of resolving a key against an override map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The override produced the text
    Text(Cow<'a, str>),
    /// The override does not cover the key; ask the host
    Fallback,
}

impl Resolution<'_> {
    /// Whether the host must answer instead
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Resolve `key` against `messages`
///
/// Keys that are absent, not of the message kind, or have empty text fall
/// back. Placeholder scanning only happens when the message defines
/// placeholders and substitutions were supplied; otherwise the raw text is
/// returned untouched, including any literal `$token$` sequences.
pub fn resolve<'a>(
    messages: &'a MessageMap,
    key: &str,
    substitutions: Option<&Substitutions>,
) -> Resolution<'a> {
    let Some(message) = messages.get(key).filter(|message| message.is_resolvable()) else {
        return Resolution::Fallback;
    };

    match (message.placeholders.as_deref(), substitutions) {
        (Some(placeholders), Some(substitutions)) if !placeholders.is_empty() => Resolution::Text(
            Cow::Owned(expand(&message.text, placeholders, substitutions.as_slice())),
        ),
        _ => Resolution::Text(Cow::Borrowed(&message.text)),
    }
}
