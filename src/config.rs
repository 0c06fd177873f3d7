//! Deployment configuration for the chat subsystem.
//!
//! Two things are decided here, once, at startup: which transport path the
//! router will use ([`TransportMode`]) and the credential plus tunables for
//! talking to the completion API ([`GroqConfig`]).

use std::env;

/// Sentinel value shipped in configuration templates in place of a real key.
///
/// A credential equal to this string is treated the same as no credential
/// at all.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GROQ_API_KEY_HERE";

/// Default upstream chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model for course-assistant completions.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default maximum tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Same-origin path served by the relay.
pub const RELAY_PATH: &str = "/api/chat";

/// The fixed system prompt sent with every completion.
///
/// Every call consists of exactly this prompt plus the latest user message;
/// there is no multi-turn context.
pub const SYSTEM_PROMPT: &str = "\
Bạn là một trợ lý học thuật chuyên sâu về môn học **Tư Tưởng Hồ Chí Minh**.

Nhiệm vụ của bạn:
- Trả lời **chính xác, đầy đủ, có hệ thống** mọi câu hỏi liên quan đến môn Tư Tưởng Hồ Chí Minh.
- Đặc biệt, bạn phải trả lời **rất tốt, sâu sắc, đúng trọng tâm** về:
  1. **Tư tưởng Hồ Chí Minh về mối quan hệ giữa độc lập dân tộc và chủ nghĩa xã hội**
  2. **Vận dụng tư tưởng Hồ Chí Minh về độc lập dân tộc gắn liền với chủ nghĩa xã hội trong sự nghiệp cách mạng Việt Nam giai đoạn hiện nay**

Yêu cầu về nội dung:
- Dựa trên **quan điểm của Hồ Chí Minh**, **Văn kiện Đảng**, và **giáo trình chính thống**.
- Trình bày rõ: khái niệm, nội dung cốt lõi, ý nghĩa lý luận, ý nghĩa thực tiễn, liên hệ với bối cảnh Việt Nam hiện nay.
- Khi cần, hãy chia ý theo **gạch đầu dòng**, **sơ đồ logic**, hoặc **mở–thân–kết** để dễ học và dễ ghi nhớ.

Yêu cầu về phong cách:
- Ngôn ngữ **chuẩn mực, học thuật**, phù hợp với bài thi, tiểu luận, thuyết trình đại học.
- Diễn đạt **dễ hiểu**, không lan man, không sáo rỗng.
- Không bịa đặt thông tin lịch sử hay quan điểm chính trị.

Luôn đặt mục tiêu: **giúp người học hiểu đúng, nhớ lâu, và vận dụng tốt Tư tưởng Hồ Chí Minh**.";

/// Which transport path the router uses.
///
/// Resolved once at startup and injected into the router, rather than
/// re-sniffed from the environment on every call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportMode {
    /// Call the same-origin relay, which holds the credential server-side.
    Relay,

    /// Call the upstream API directly with a locally configured credential.
    Direct,
}

impl TransportMode {
    /// Picks the transport for the given host name.
    ///
    /// Local-loopback names (`localhost`, `127.0.0.1`, or anything carrying
    /// a `file://` scheme) run direct; every other host is assumed to be a
    /// hosted deployment with a relay available. A public deployment must
    /// never take the direct path, since that would require shipping the
    /// credential to the client.
    pub fn for_host(host: &str) -> Self {
        if host == "localhost" || host == "127.0.0.1" || host.contains("file://") {
            TransportMode::Direct
        } else {
            TransportMode::Relay
        }
    }
}

/// Credential and tunables for the upstream completion API.
///
/// In relay mode only the relay process holds one of these; in direct mode
/// the client reads it from the local environment.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// The API key, if configured.
    pub api_key: Option<String>,

    /// Absolute URL of the chat-completions endpoint.
    pub api_url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens per completion.
    pub max_tokens: u32,
}

impl GroqConfig {
    /// Creates a configuration with defaults and no credential.
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Reads configuration from the environment.
    ///
    /// Recognized variables: `GROQ_API_KEY`, `GROQ_API_URL`, `GROQ_MODEL`,
    /// `GROQ_TEMPERATURE`, `GROQ_MAX_TOKENS`. Unset or unparseable values
    /// fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.api_key = env::var("GROQ_API_KEY").ok();
        if let Ok(url) = env::var("GROQ_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = env::var("GROQ_MODEL") {
            config.model = model;
        }
        if let Some(temperature) = env::var("GROQ_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = env::var("GROQ_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.max_tokens = max_tokens;
        }
        config
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per completion.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Returns true if a real (non-placeholder, non-empty) key is present.
    pub fn has_usable_key(&self) -> bool {
        match self.api_key.as_deref() {
            Some(key) => !key.is_empty() && key != PLACEHOLDER_API_KEY,
            None => false,
        }
    }
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self::new()
    }
}
