//! CLI module - command-line interface
//!
//! Contains the REPL, command parsing and log setup.

pub mod commands;
pub mod logging;
pub mod repl;

pub use logging::{init_logging, LogControl};
pub use repl::Repl;
