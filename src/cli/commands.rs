//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use tracing::info;

use crate::core::{Config, Result};
use crate::dispatch::Dispatcher;

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Toggle verbose logging
    ToggleDebug,
    /// Exit the REPL
    Exit,
}

/// Parse and handle special commands
pub async fn handle_command(
    input: &str,
    dispatcher: &Dispatcher,
    config: &Config,
) -> Result<CommandResult> {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    // Bare-word commands take no arguments; "help me find ..." is a request
    let bare = matches!(
        cmd.as_str(),
        "exit" | "quit" | "q" | "help" | "?" | "status" | "debug"
    );
    if bare && !args.is_empty() {
        return Ok(CommandResult::Continue(input.to_string()));
    }

    match cmd.as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "status" => Ok(CommandResult::Handled(
            status_text(dispatcher, config).await,
        )),

        "intent" => {
            if args.is_empty() {
                return Ok(CommandResult::Handled(
                    "Usage: intent <text>\nExample: intent weather in Pune".to_string(),
                ));
            }
            let intent = dispatcher.extract(args);
            info!(kind = %intent.kind(), "Intent preview");
            Ok(CommandResult::Handled(serde_json::to_string_pretty(&intent)?))
        }

        "debug" => Ok(CommandResult::ToggleDebug),

        _ => {
            // Not a command, treat as normal input
            if input.starts_with('/') {
                Ok(CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                )))
            } else {
                Ok(CommandResult::Continue(input.to_string()))
            }
        }
    }
}

async fn status_text(dispatcher: &Dispatcher, config: &Config) -> String {
    let backends = dispatcher.check_backends().await;
    let max_sessions = match config.browser.max_sessions {
        0 => "unbounded".to_string(),
        n => n.to_string(),
    };

    format!(
        "Errand Status:\n\
         ─────────────────────────────\n\
         Model:        {} ({})\n\
         Ollama:       {} ({})\n\
         Browser:      {} ({})\n\
         Headed:       {}\n\
         Max sessions: {}",
        dispatcher.model(),
        if backends.model_available {
            "available"
        } else {
            "not pulled"
        },
        config.ollama_url(),
        if backends.llm_reachable {
            "reachable"
        } else {
            "unreachable"
        },
        config.browser.program,
        if backends.browser_available {
            "found"
        } else {
            "missing"
        },
        if config.browser.headed { "yes" } else { "no" },
        max_sessions
    )
}

/// Generate help text
fn help_text() -> String {
    r#"Errand Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit Errand
  status           Show configuration and backend reachability
  intent <text>    Show the intent extracted from <text>
  debug            Toggle debug logging

Anything else is handled as a request, for example:
  movie tickets for Dune in Mumbai tomorrow
  weather in Pune
  play lofi beats on youtube
  open notepad
  tell me a joke
─────────────────────────────────────────────"#
        .to_string()
}
