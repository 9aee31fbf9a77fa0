//! Shared types used across Errand modules
//!
//! Contains chat messages, intents and the workflow result contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A message in a conversation with the language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Launch a desktop application
    OpenApplication,
    /// Look up movie tickets
    SearchTickets,
    /// Look up the weather for a location
    GetWeather,
    /// Find and play a video
    PlayVideo,
    /// Anything else; answered by the language model
    GenericChat,
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentKind::OpenApplication => write!(f, "open_application"),
            IntentKind::SearchTickets => write!(f, "search_tickets"),
            IntentKind::GetWeather => write!(f, "get_weather"),
            IntentKind::PlayVideo => write!(f, "play_video"),
            IntentKind::GenericChat => write!(f, "generic_chat"),
        }
    }
}

/// Named parameters captured from the request text
pub type Slots = BTreeMap<String, String>;

/// Structured request extracted from free text.
///
/// Fields are private so an intent cannot change after extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    kind: IntentKind,
    slots: Slots,
}

impl Intent {
    /// Create an intent from a kind and its slots
    pub fn new(kind: IntentKind, slots: Slots) -> Self {
        Self { kind, slots }
    }

    /// The intent kind
    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    /// All captured slots
    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    /// Get a slot value by name
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

/// Outcome of one workflow invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Whether the workflow achieved its goal
    pub success: bool,
    /// Human-readable outcome, always present
    pub message: String,
    /// Workflow-specific structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl WorkflowResult {
    /// Create a successful result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: None,
        }
    }

    /// Create a successful result with structured data
    pub fn success_with_payload(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Create a failed result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }
}
