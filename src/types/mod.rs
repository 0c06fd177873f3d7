// Public modules
pub mod chat_completion;
pub mod chat_message;
pub mod completion_request;
pub mod completion_result;

// Re-exports
pub use chat_completion::{ChatCompletion, ChoiceMessage, CompletionChoice, Usage};
pub use chat_message::{ChatMessage, Sender};
pub use completion_request::{CompletionRequest, MessageParam, Role};
pub use completion_result::CompletionResult;
