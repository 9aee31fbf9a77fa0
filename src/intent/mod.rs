//! Intent module - free text to structured requests
//!
//! Ordered pattern rules decide what the user wants and capture the
//! parameters a workflow needs.

pub mod extractor;
pub mod slots;

pub use extractor::IntentExtractor;
