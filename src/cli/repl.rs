//! Interactive REPL for Errand
//!
//! Provides the main user interaction loop.

use std::io::{self, BufRead, Write};

use crate::cli::commands::{handle_command, CommandResult};
use crate::cli::LogControl;
use crate::core::{Config, Result};
use crate::dispatch::Dispatcher;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    dispatcher: Dispatcher,
    config: Config,
    logs: Option<LogControl>,
    debug: bool,
}

impl Repl {
    /// Create a REPL with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::from_config(&config)?,
            config,
            logs: None,
            debug: false,
        })
    }

    /// Let the `debug` command change the log level
    pub fn with_log_control(mut self, logs: LogControl, debug: bool) -> Self {
        self.logs = Some(logs);
        self.debug = debug;
        self
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        print!("Checking backends...");
        io::stdout().flush()?;

        let status = self.dispatcher.check_backends().await;
        println!(" done.\n");

        if !status.llm_reachable {
            println!(
                "⚠️  Ollama is not reachable at {}. General questions will fail.",
                self.config.ollama_url()
            );
        } else if !status.model_available {
            println!(
                "⚠️  Model '{}' is not pulled. Run: ollama pull {}",
                self.dispatcher.model(),
                self.dispatcher.model()
            );
        }

        if !status.browser_available {
            println!("⚠️  agent-browser not found. Ticket, weather and video requests will fail.");
            println!("   To enable: npm install -g agent-browser && agent-browser install");
        }
        println!();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            // Print prompt
            print!("You: ");
            stdout.flush()?;

            // Read input
            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            match handle_command(input, &self.dispatcher, &self.config).await {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                }
                Ok(CommandResult::ToggleDebug) => {
                    self.debug = !self.debug;
                    match &self.logs {
                        Some(logs) => {
                            logs.set_debug(self.debug);
                            println!("Debug mode: {}\n", if self.debug { "ON" } else { "OFF" });
                        }
                        None => println!("Logging is not managed by this session.\n"),
                    }
                }
                Ok(CommandResult::Continue(input)) => {
                    let reply = self.dispatcher.handle(&input).await;
                    println!("\nErrand:\n{}\n", reply);
                }
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!(
            r#"
╔═══════════════════════════════════════════════╗
║                                               ║
║   Errand - tickets, weather, videos & chat    ║
║                                               ║
╚═══════════════════════════════════════════════╝
"#
        );
        println!("Ollama:   {}", self.config.ollama_url());
        println!("Model:    {}", self.dispatcher.model());
        println!("Browser:  {}", self.config.browser.program);
        println!();
        println!("Commands: help, status, intent, debug, exit");
        println!("─────────────────────────────────────────────────");
    }
}
