//! Configuration types for the chat REPL.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration controlling transport mode and rendering.

use arrrg_derive::CommandLine;

use crate::config::{GroqConfig, TransportMode};
use crate::error::Result;
use crate::router::Router;

/// Command-line arguments for the lectern-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Relay origin to route through instead of calling upstream directly.
    #[arrrg(optional, "Relay origin to route through (default: call upstream directly)", "ORIGIN")]
    pub relay: Option<String>,

    /// Model override.
    #[arrrg(optional, "Model to use (default: llama-3.3-70b-versatile)", "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 4096)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Render assistant replies as HTML.
    #[arrrg(flag, "Render assistant replies as HTML")]
    pub html: bool,
}

/// Resolved configuration for a chat REPL session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Relay origin; `None` selects direct mode.
    pub relay_origin: Option<String>,

    /// Whether assistant replies are rendered to HTML before display.
    pub html: bool,

    /// Credential and tunables for the completion API.
    pub groq: GroqConfig,
}

impl ChatConfig {
    /// Creates a configuration with defaults: direct mode, plain text
    /// display, environment-free Groq defaults.
    pub fn new() -> Self {
        Self {
            relay_origin: None,
            html: false,
            groq: GroqConfig::new(),
        }
    }

    /// Sets the relay origin, switching the session to relay mode.
    pub fn with_relay_origin(mut self, origin: impl Into<String>) -> Self {
        self.relay_origin = Some(origin.into());
        self
    }

    /// Sets HTML rendering of replies.
    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    /// Sets the Groq configuration.
    pub fn with_groq(mut self, groq: GroqConfig) -> Self {
        self.groq = groq;
        self
    }

    /// The transport mode this configuration selects.
    pub fn mode(&self) -> TransportMode {
        if self.relay_origin.is_some() {
            TransportMode::Relay
        } else {
            TransportMode::Direct
        }
    }

    /// Builds the router for this configuration.
    pub fn build_router(&self) -> Result<Router> {
        let origin = self.relay_origin.as_deref().unwrap_or("");
        Router::for_mode(self.mode(), origin, self.groq.clone())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let mut groq = GroqConfig::from_env();
        if let Some(model) = args.model {
            groq.model = model;
        }
        if let Some(max_tokens) = args.max_tokens {
            groq.max_tokens = max_tokens;
        }
        ChatConfig {
            relay_origin: args.relay,
            html: args.html,
            groq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODEL;

    #[test]
    fn default_config_is_direct_plain_text() {
        let config = ChatConfig::new();
        assert_eq!(config.mode(), TransportMode::Direct);
        assert!(!config.html);
        assert_eq!(config.groq.model, DEFAULT_MODEL);
    }

    #[test]
    fn relay_origin_selects_relay_mode() {
        let config = ChatConfig::new().with_relay_origin("https://hcm202.vercel.app");
        assert_eq!(config.mode(), TransportMode::Relay);
    }

    #[test]
    fn args_override_model_and_tokens() {
        let args = ChatArgs {
            relay: None,
            model: Some("llama-3.1-8b-instant".to_string()),
            max_tokens: Some(1024),
            html: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.mode(), TransportMode::Direct);
        assert_eq!(config.groq.model, "llama-3.1-8b-instant");
        assert_eq!(config.groq.max_tokens, 1024);
        assert!(config.html);
    }

    #[test]
    fn builder_pattern() {
        let config = ChatConfig::new()
            .with_relay_origin("http://127.0.0.1:3000")
            .with_html(true)
            .with_groq(GroqConfig::new().with_model("m"));
        assert_eq!(config.relay_origin.as_deref(), Some("http://127.0.0.1:3000"));
        assert!(config.html);
        assert_eq!(config.groq.model, "m");
    }
}
