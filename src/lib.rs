//! Errand - Intent-routed browser errands
//!
//! Turns short natural-language requests into either a browser automation
//! workflow (movie tickets, weather, video playback), a desktop application
//! launch, or a language-model reply served by Ollama.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Intent**: Rule-based intent and slot extraction
//! - **Browser**: Isolated, bounded browser sessions over agent-browser
//! - **Workflows**: Ticket, weather and video automations
//! - **LLM**: LLM provider abstraction with Ollama implementation
//! - **Dispatch**: Routing a message to exactly one handler
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use errand::{Config, Dispatcher};
//!
//! #[tokio::main]
//! async fn main() -> errand::Result<()> {
//!     let dispatcher = Dispatcher::from_config(&Config::load())?;
//!
//!     let reply = dispatcher.handle("weather in Pune").await;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod dispatch;
pub mod intent;
pub mod llm;
pub mod workflows;

// Re-export commonly used items
pub use cli::Repl;
pub use core::{Config, ErrandError, Intent, IntentKind, Result, WorkflowResult};
pub use dispatch::Dispatcher;
pub use intent::IntentExtractor;
