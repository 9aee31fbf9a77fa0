//! LLM module - Language Model integrations
//!
//! The language model answers everything the intent rules do not route to
//! a workflow. Ollama is the bundled backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaClient;
pub use traits::{GenerateOptions, LLMProvider, LLMResponse, TokenUsage};
