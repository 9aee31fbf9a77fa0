//! Log output setup
//!
//! `RUST_LOG` wins when set; otherwise the level follows the debug flag.
//! The filter stays reloadable so the REPL can toggle debug output.

use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Switches the active log level after start-up
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
}

fn level(debug: bool) -> &'static str {
    if debug {
        "errand=debug,info"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Logs go to stderr so replies on stdout
/// stay clean.
pub fn init_logging(debug: bool) -> LogControl {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level(debug)));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    LogControl { handle }
}

impl LogControl {
    /// Apply the debug or quiet level
    pub fn set_debug(&self, debug: bool) {
        if let Err(e) = self.handle.reload(EnvFilter::new(level(debug))) {
            eprintln!("Failed to change log level: {}", e);
        }
    }
}
