//! Normalizes transport outcomes into displayable results.
//!
//! The [`Router`] owns the single branch point of the system: which
//! transport serves a completion. Per deployment it is constructed once,
//! from a [`TransportMode`], and from then on every exchange flows through
//! [`Router::assistant_reply`], which never fails: transport errors of
//! every kind are folded into [`CompletionResult::Failure`] with a short
//! user-facing message in the conversation's language.

use crate::client::{CompletionTransport, DirectClient, RelayClient};
use crate::config::{GroqConfig, SYSTEM_PROMPT, TransportMode};
use crate::error::{Error, Result};
use crate::types::{CompletionRequest, CompletionResult};

/// Shown when the upstream rejects the credential (HTTP 401).
pub(crate) const MSG_AUTH: &str = "❌ Lỗi xác thực API key. Vui lòng kiểm tra lại cấu hình.";

/// Shown when the upstream rate-limits the caller (HTTP 429).
pub(crate) const MSG_RATE_LIMIT: &str = "⚠️ Quá nhiều request. Vui lòng đợi 1-2 phút rồi thử lại.";

/// Shown for network-level failures.
pub(crate) const MSG_CONNECTION: &str = "🌐 Lỗi kết nối. Kiểm tra internet và thử lại.";

/// Shown when a success response carries no completion choice.
pub(crate) const MSG_EMPTY: &str = "❌ Không nhận được phản hồi từ mô hình. Vui lòng thử lại.";

/// Shown when direct mode has no usable credential. Setup instructions,
/// not an error dump: this branch is hit before any network activity.
pub(crate) const MSG_SETUP: &str = "\
❌ **Chưa thiết lập API key**

Bạn đang chạy ở chế độ gọi trực tiếp (direct mode). Để sử dụng:

1. Lấy API key tại: https://console.groq.com
2. Đặt biến môi trường `GROQ_API_KEY` rồi chạy lại
3. Hoặc triển khai cùng relay, khi đó phía client không cần API key";

/// Decides the transport path and normalizes its outcomes.
pub struct Router {
    transport: Box<dyn CompletionTransport>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Router {
    /// Builds the router for a resolved transport mode.
    ///
    /// `relay_origin` is only consulted in relay mode; `config` supplies
    /// the model tunables in both modes and the credential in direct mode.
    pub fn for_mode(mode: TransportMode, relay_origin: &str, config: GroqConfig) -> Result<Self> {
        let transport: Box<dyn CompletionTransport> = match mode {
            TransportMode::Relay => Box::new(RelayClient::new(relay_origin)?),
            TransportMode::Direct => Box::new(DirectClient::new(config.clone())?),
        };
        Ok(Self::with_transport(transport, &config))
    }

    /// Builds the router around an arbitrary transport.
    pub fn with_transport(transport: Box<dyn CompletionTransport>, config: &GroqConfig) -> Self {
        Self {
            transport,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// The model requested on every exchange.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The endpoint the active transport posts to.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Runs one exchange: the fixed system prompt plus `user_text`.
    ///
    /// Always returns a value. The failure text is ready for display as
    /// ordinary assistant output; callers never need to inspect transport
    /// details.
    pub async fn assistant_reply(&self, user_text: &str) -> CompletionResult {
        let request = CompletionRequest::exchange(
            &self.model,
            SYSTEM_PROMPT,
            user_text,
            self.temperature,
            self.max_tokens,
        );
        match self.transport.complete(&request).await {
            Ok(completion) => match completion.into_first_content() {
                Some(text) => CompletionResult::Reply(text),
                None => CompletionResult::Failure(MSG_EMPTY.to_string()),
            },
            Err(err) => CompletionResult::Failure(user_message(&err)),
        }
    }
}

/// Maps an error to the user-facing message shown in its place.
pub(crate) fn user_message(err: &Error) -> String {
    match err {
        Error::Configuration { .. } => MSG_SETUP.to_string(),
        Error::Authentication { .. } => MSG_AUTH.to_string(),
        Error::RateLimit { .. } => MSG_RATE_LIMIT.to_string(),
        Error::Connection { .. } | Error::Timeout { .. } | Error::HttpClient { .. } => {
            MSG_CONNECTION.to_string()
        }
        Error::EmptyCompletion { .. } => MSG_EMPTY.to_string(),
        Error::Api { message, .. } => format!("❌ Lỗi: {message}"),
        other => format!("❌ Lỗi: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::client::classify_status;
    use crate::types::{ChatCompletion, ChoiceMessage, CompletionChoice, Role};

    struct MockTransport {
        outcome: std::result::Result<ChatCompletion, Error>,
        seen: Arc<Mutex<Option<CompletionRequest>>>,
    }

    impl MockTransport {
        fn new(outcome: std::result::Result<ChatCompletion, Error>) -> Self {
            Self {
                outcome,
                seen: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl CompletionTransport for MockTransport {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> crate::error::Result<ChatCompletion> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.outcome.clone()
        }

        fn endpoint(&self) -> &str {
            "mock://completions"
        }
    }

    fn completion_with(text: &str) -> ChatCompletion {
        ChatCompletion {
            choices: vec![CompletionChoice {
                message: ChoiceMessage {
                    content: text.to_string(),
                },
            }],
            usage: None,
        }
    }

    fn router_with(outcome: std::result::Result<ChatCompletion, Error>) -> Router {
        Router::with_transport(Box::new(MockTransport::new(outcome)), &GroqConfig::new())
    }

    #[tokio::test]
    async fn reply_passes_model_text_through() {
        let router = router_with(Ok(completion_with("Chào bạn!")));
        let result = router.assistant_reply("xin chào").await;
        assert_eq!(result, CompletionResult::Reply("Chào bạn!".to_string()));
    }

    #[tokio::test]
    async fn request_carries_system_prompt_and_user_text() {
        let transport = MockTransport::new(Ok(completion_with("ok")));
        let seen = Arc::clone(&transport.seen);
        let config = GroqConfig::new().with_temperature(0.5).with_max_tokens(128);
        let router = Router::with_transport(Box::new(transport), &config);
        router.assistant_reply("câu hỏi").await;

        let request = seen.lock().unwrap().clone().expect("request was sent");
        assert_eq!(request.model, config.model);
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_tokens, 128);
        assert_eq!(request.top_p, 1.0);
        assert!(!request.stream);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "câu hỏi");
    }

    #[tokio::test]
    async fn upstream_401_maps_to_auth_message() {
        let err = classify_status(401, r#"{"error":{"message":"invalid key"}}"#, None);
        let router = router_with(Err(err));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure(MSG_AUTH.to_string()));
    }

    #[tokio::test]
    async fn upstream_429_maps_to_rate_limit_message() {
        let err = classify_status(429, "{}", Some(60));
        let router = router_with(Err(err));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure(MSG_RATE_LIMIT.to_string()));
    }

    #[tokio::test]
    async fn success_without_choices_maps_to_empty_message() {
        let router = router_with(Ok(ChatCompletion {
            choices: vec![],
            usage: None,
        }));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure(MSG_EMPTY.to_string()));
    }

    #[tokio::test]
    async fn missing_credential_maps_to_setup_instructions() {
        let router = router_with(Err(Error::configuration("no key")));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure(MSG_SETUP.to_string()));
    }

    #[tokio::test]
    async fn network_failure_maps_to_connection_message() {
        let router = router_with(Err(Error::connection("refused", None)));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure(MSG_CONNECTION.to_string()));
    }

    #[tokio::test]
    async fn generic_upstream_error_includes_detail() {
        let err = classify_status(500, r#"{"error":{"message":"internal"}}"#, None);
        let router = router_with(Err(err));
        let result = router.assistant_reply("hỏi").await;
        assert_eq!(result, CompletionResult::Failure("❌ Lỗi: internal".to_string()));
    }

    #[test]
    fn mode_selects_transport_endpoint() {
        let config = GroqConfig::new().with_api_key("gsk_test");

        let mode = TransportMode::for_host("hcm202.vercel.app");
        let router =
            Router::for_mode(mode, "https://hcm202.vercel.app", config.clone()).unwrap();
        assert_eq!(router.endpoint(), "https://hcm202.vercel.app/api/chat");

        let mode = TransportMode::for_host("localhost");
        let router = Router::for_mode(mode, "https://hcm202.vercel.app", config).unwrap();
        assert_eq!(
            router.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
