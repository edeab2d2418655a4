//! Inbound events from other execution contexts

use crate::model::Language;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A message received from another context
///
/// Only messages whose `action` matches the layer's apply action and that
/// carry a `language` change the override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// What the sender asks for
    pub action: String,
    /// Language to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl InboundMessage {
    /// Build an apply message for `language`
    pub fn apply_language(action: impl Into<String>, language: Language) -> Self {
        Self {
            action: action.into(),
            language: Some(language),
        }
    }
}

/// Sending half of an inbound event channel
pub type EventSender = mpsc::UnboundedSender<InboundMessage>;

/// Receiving half of an inbound event channel
pub type EventReceiver = mpsc::UnboundedReceiver<InboundMessage>;

/// Create an inbound event channel
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
