//! Browser session module
//!
//! Drives headless browsers for workflows: one isolated session per
//! invocation, bounded waits, guaranteed teardown.

mod driver;
mod executor;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::{BrowserDriver, BrowserPage};
pub use executor::AgentBrowserDriver;
pub use session::{Session, SessionManager, SessionSettings};
