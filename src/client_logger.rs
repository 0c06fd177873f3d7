//! Logging trait for completion client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture and log the exchanges passing through a transport, without the
//! transport knowing where the records go.

use crate::types::{ChatCompletion, CompletionRequest};

/// A trait for logging completion client operations.
///
/// Implement this trait to record outgoing requests and the completions
/// that came back, e.g. for auditing token usage or debugging prompt
/// construction. Failures are not logged through this trait; they surface
/// as error values on the call path.
///
/// # Example
///
/// ```rust,ignore
/// use lectern::{ChatCompletion, ClientLogger, CompletionRequest};
/// use std::sync::Mutex;
///
/// struct UsageLog {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl ClientLogger for UsageLog {
///     fn log_request(&self, request: &CompletionRequest) {
///         self.lines.lock().unwrap().push(format!("-> {}", request.model));
///     }
///
///     fn log_completion(&self, completion: &ChatCompletion) {
///         if let Some(usage) = completion.usage {
///             self.lines.lock().unwrap().push(format!("<- {} tokens", usage.total_tokens));
///         }
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log an outgoing completion request.
    ///
    /// Called once per call, after configuration checks pass and before the
    /// request is sent.
    fn log_request(&self, request: &CompletionRequest);

    /// Log a successful completion.
    ///
    /// Called once per call with the parsed response, which is guaranteed
    /// to contain at least one choice.
    fn log_completion(&self, completion: &ChatCompletion);
}
