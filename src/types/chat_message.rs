use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils;

/// One entry in the session's conversation log.
///
/// Messages are created on every send and receive, appended to the log in
/// order, and never mutated. The log is not persisted anywhere; it dies
/// with the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The message text. For assistant messages this is the raw model
    /// output (or a user-facing failure message); rendering to HTML happens
    /// at display time.
    pub text: String,

    /// Who produced the message.
    pub sender: Sender,

    /// When the message was appended to the log.
    #[serde(with = "crate::utils::time")]
    pub created_at: OffsetDateTime,
}

/// The originator of a chat message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person using the chat surface.
    User,

    /// Returned by the model (or synthesized by the router on failure).
    Assistant,
}

impl ChatMessage {
    /// Creates a new `ChatMessage` stamped with the current time.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            created_at: utils::time::now(),
        }
    }

    /// Creates a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Creates a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_sender() {
        assert_eq!(ChatMessage::user("hi").sender, Sender::User);
        assert_eq!(ChatMessage::assistant("chào").sender, Sender::Assistant);
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Sender::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(Sender::Assistant).unwrap(), "assistant");
    }

    #[test]
    fn message_round_trips() {
        let message = ChatMessage::user("độc lập dân tộc");
        let json = serde_json::to_string(&message).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
