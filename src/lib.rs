// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod error;
pub mod escape;
pub mod markdown;
pub mod observability;
pub mod relay;
pub mod router;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{CompletionTransport, DirectClient, RelayClient};
pub use client_logger::ClientLogger;
pub use config::{GroqConfig, TransportMode};
pub use error::{Error, Result};
pub use router::Router;
pub use types::*;
