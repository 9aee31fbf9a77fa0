//! Errand - Intent-routed browser errands
//!
//! Main entry point for the CLI application.

use clap::Parser;
use errand::cli::init_logging;
use errand::{Config, Dispatcher, IntentExtractor, Repl};

/// Errand - tickets, weather, videos and chat from one prompt
#[derive(Parser, Debug)]
#[command(name = "errand")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chat model used for general questions
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Maximum concurrent browser sessions (0 = unbounded)
    #[arg(long)]
    max_sessions: Option<usize>,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,

    /// Print the extracted intent as JSON and exit
    #[arg(long, short = 'i')]
    intent: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let logs = init_logging(args.debug);

    if let Some(text) = args.intent {
        let intent = IntentExtractor::new().extract(&text);
        println!("{}", serde_json::to_string_pretty(&intent)?);
        return Ok(());
    }

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(model) = args.model {
        config.model.chat = model;
    }

    if args.headed {
        config.browser.headed = true;
    }

    if let Some(max_sessions) = args.max_sessions {
        config.browser.max_sessions = max_sessions;
    }

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let dispatcher = Dispatcher::from_config(&config)?;
        println!("{}", dispatcher.handle(&prompt).await);
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::with_config(config)?.with_log_control(logs, args.debug);
    repl.run().await?;

    Ok(())
}
