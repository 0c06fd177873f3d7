//! Serves the relay forwarding shim.
//!
//! The relay holds the Groq credential server-side (from `GROQ_API_KEY`)
//! and forwards `POST /api/chat` bodies upstream, mirroring the upstream
//! response. Deploy it next to the course site so browsers never see the
//! key.
//!
//! # Usage
//!
//! ```bash
//! GROQ_API_KEY=gsk_... lectern-relay --port 3000
//! ```

use arrrg::CommandLine;

use lectern::GroqConfig;
use lectern::relay::{self, RelayArgs};

/// Main entry point for the lectern-relay application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = RelayArgs::from_command_line_relaxed("lectern-relay [OPTIONS]");
    let port = u16::try_from(args.port.unwrap_or(3000))?;

    let config = GroqConfig::from_env();
    if !config.has_usable_key() {
        eprintln!("warning: GROQ_API_KEY is not set; every request will be answered with 500");
    }

    let app = relay::app(config)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    println!("lectern-relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
