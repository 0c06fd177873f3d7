//! Interactive chat with the course assistant.
//!
//! This binary provides a REPL interface over the same chat core the
//! course site embeds: one fixed system prompt plus the latest user
//! message per exchange, routed through the relay or straight to the
//! upstream API.
//!
//! # Usage
//!
//! ```bash
//! # Direct mode: reads GROQ_API_KEY from the environment
//! lectern-chat
//!
//! # Route through a deployed relay (no local key needed)
//! lectern-chat --relay https://hcm202.vercel.app
//!
//! # Show replies as rendered HTML instead of raw Markdown
//! lectern-chat --html
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/html on|off` - Toggle HTML rendering of replies
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use lectern::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, SendOutcome, help_text, parse_command,
};
use lectern::markdown;

/// Main entry point for the lectern-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("lectern-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut html = config.html;

    let router = config.build_router()?;
    let mut session = ChatSession::new(router);
    let mut rl = DefaultEditor::new()?;

    println!("Course assistant (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            println!("Conversation cleared.");
                        }
                        ChatCommand::Html(on) => {
                            html = on;
                            if on {
                                println!("Replies will be rendered as HTML.");
                            } else {
                                println!("Replies will be shown as raw text.");
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            eprintln!("{}", message);
                        }
                    }
                    continue;
                }

                // Regular message - send through the router.
                println!("Assistant:");
                match session.send(line).await {
                    SendOutcome::Replied(message) => {
                        if html {
                            println!("{}\n", markdown::render(&message.text));
                        } else {
                            println!("{}\n", message.text);
                        }
                    }
                    SendOutcome::Busy => {
                        println!("(previous reply still pending)");
                    }
                    SendOutcome::Empty => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - clear the line and keep going
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!(
        "      Messages: {} ({} user / {} assistant)",
        stats.message_count, stats.user_messages, stats.assistant_messages
    );
    println!("      Requests: {}", stats.request_count);
}
