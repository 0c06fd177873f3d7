use serde::{Deserialize, Serialize};

/// A successful chat-completions response body.
///
/// Only the fields this subsystem consumes are modeled; unknown fields in
/// the upstream payload are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// The completion choices. The first choice's message content is the
    /// assistant reply; an empty list is treated as a failed call.
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,

    /// Token accounting for the call, when the upstream provides it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// The message inside a completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// The generated text.
    pub content: String,
}

/// Token usage reported by the completion API.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,

    /// Tokens generated in the completion.
    pub completion_tokens: u32,

    /// Prompt plus completion tokens.
    pub total_tokens: u32,
}

impl ChatCompletion {
    /// Returns the first choice's message content, if any choice exists.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }

    /// Consumes the completion and returns the first choice's content.
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}
