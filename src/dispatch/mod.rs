//! Dispatch module - message routing
//!
//! Connects the intent extractor to workflows, the application launcher
//! and the language model.

pub mod dispatcher;
pub mod launcher;

pub use dispatcher::{BackendStatus, Dispatcher};
pub use launcher::{launch_plan, AppLauncher, LaunchPlan, SystemLauncher};
