use serde::{Deserialize, Serialize};

/// The JSON body of one chat-completions call.
///
/// Built fresh for every exchange and immutable once built. Both transports
/// send exactly this shape; the relay fills in nothing the client did not
/// already provide. `top_p` is always 1.0 and `stream` is always false;
/// streaming is not part of this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier, e.g. `llama-3.3-70b-versatile`.
    pub model: String,

    /// The conversation to complete: the fixed system prompt plus the
    /// latest user message. There is no multi-turn history.
    pub messages: Vec<MessageParam>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens in the completion.
    pub max_tokens: u32,

    /// Nucleus sampling parameter.
    pub top_p: f32,

    /// Whether to stream the response.
    pub stream: bool,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageParam {
    /// The role of the message.
    pub role: Role,

    /// The content of the message.
    pub content: String,
}

/// Role type for a message parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System role.
    System,

    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl MessageParam {
    /// Create a new `MessageParam` with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a new system `MessageParam`.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a new user `MessageParam`.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant `MessageParam`.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl CompletionRequest {
    /// Builds the request for one exchange: the fixed system prompt plus
    /// the latest user message.
    pub fn exchange(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_text: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                MessageParam::system(system_prompt),
                MessageParam::user(user_text),
            ],
            temperature,
            max_tokens,
            top_p: 1.0,
            stream: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(to_value(Role::System).unwrap(), "system");
        assert_eq!(to_value(Role::User).unwrap(), "user");
        assert_eq!(to_value(Role::Assistant).unwrap(), "assistant");
    }

    #[test]
    fn exchange_wire_shape() {
        let request = CompletionRequest::exchange(
            "llama-3.3-70b-versatile",
            "Bạn là một trợ lý học thuật.",
            "Độc lập dân tộc là gì?",
            0.5,
            4096,
        );
        let json = to_value(&request).unwrap();

        assert_eq!(
            json,
            json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [
                    { "role": "system", "content": "Bạn là một trợ lý học thuật." },
                    { "role": "user", "content": "Độc lập dân tộc là gì?" }
                ],
                "temperature": 0.5,
                "max_tokens": 4096,
                "top_p": 1.0,
                "stream": false
            })
        );
    }

    #[test]
    fn exchange_never_streams() {
        let request = CompletionRequest::exchange("m", "s", "u", 0.0, 1);
        assert!(!request.stream);
        assert_eq!(request.top_p, 1.0);
        assert_eq!(request.messages.len(), 2);
    }
}
