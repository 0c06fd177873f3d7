//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the
//! conversation log and orchestrates the request/response cycle through
//! the router.

use crate::observability;
use crate::router::Router;
use crate::types::{ChatMessage, CompletionResult, Sender};

/// Control state of a session: either ready for input or waiting on the
/// router to resolve.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SessionState {
    Idle,
    AwaitingReply,
}

/// The outcome of one [`ChatSession::send`] attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The exchange completed. The assistant message (which may carry a
    /// user-facing failure text) has been appended to the log.
    Replied(ChatMessage),

    /// The input was empty after trimming; nothing was sent.
    Empty,

    /// A reply is already outstanding; the input was dropped.
    Busy,
}

/// A chat session that owns the message log and the in-flight guard.
///
/// There is no ambient session state: every consumer that needs history
/// receives it from this instance via [`ChatSession::messages`]. At most
/// one completion request is outstanding at a time; `send` while waiting
/// is a no-op, mirroring a typing indicator that ignores repeated Enter
/// presses. In-flight requests cannot be cancelled.
pub struct ChatSession {
    router: Router,
    messages: Vec<ChatMessage>,
    state: SessionState,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The model requested on every exchange.
    pub model: String,
    /// Total messages in the log.
    pub message_count: usize,
    /// Messages sent by the user.
    pub user_messages: usize,
    /// Messages from the assistant (including failure texts).
    pub assistant_messages: usize,
    /// Completion requests issued.
    pub request_count: u64,
}

impl ChatSession {
    /// Creates a new session around the given router.
    pub fn new(router: Router) -> Self {
        Self {
            router,
            messages: Vec::new(),
            state: SessionState::Idle,
            request_count: 0,
        }
    }

    /// Sends a user message and waits for the assistant reply.
    ///
    /// Appends the user message, invokes the router, and appends the
    /// resulting assistant message. The router never fails at the value
    /// level, so neither does this method: transport failures arrive as
    /// assistant text.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = match self.begin(text) {
            Ok(text) => text,
            Err(outcome) => return outcome,
        };
        let result = self.router.assistant_reply(&text).await;
        SendOutcome::Replied(self.finish(result))
    }

    /// First half of `send`: validates input, applies the re-entrancy
    /// guard, and appends the user message.
    fn begin(&mut self, text: &str) -> Result<String, SendOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SendOutcome::Empty);
        }
        if self.state == SessionState::AwaitingReply {
            observability::SESSION_SENDS_DROPPED.click();
            return Err(SendOutcome::Busy);
        }
        observability::SESSION_SENDS.click();
        self.messages.push(ChatMessage::user(trimmed));
        self.state = SessionState::AwaitingReply;
        self.request_count += 1;
        Ok(trimmed.to_string())
    }

    /// Second half of `send`: appends the assistant message and returns
    /// the session to idle.
    fn finish(&mut self, result: CompletionResult) -> ChatMessage {
        let message = ChatMessage::assistant(result.into_text());
        self.messages.push(message.clone());
        self.state = SessionState::Idle;
        message
    }

    /// The conversation log, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// True while a completion request is outstanding.
    pub fn is_awaiting_reply(&self) -> bool {
        self.state == SessionState::AwaitingReply
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The model requested on every exchange.
    pub fn model(&self) -> &str {
        self.router.model()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let user_messages = self
            .messages
            .iter()
            .filter(|m| m.sender == Sender::User)
            .count();
        SessionStats {
            model: self.router.model().to_string(),
            message_count: self.messages.len(),
            user_messages,
            assistant_messages: self.messages.len() - user_messages,
            request_count: self.request_count,
        }
    }
}
