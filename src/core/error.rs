//! Custom error types for Errand
//!
//! Provides a unified error handling system across all modules. Browser
//! automation failures are split into the kinds a workflow needs to tell
//! apart (launch, navigation, missing element, extraction).

use thiserror::Error;

/// Main error type for Errand operations
#[derive(Error, Debug)]
pub enum ErrandError {
    /// Browser process could not be started
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Page did not finish loading in time
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    Navigation { url: String, timeout_ms: u64 },

    /// Expected selector never appeared
    #[error("Element '{selector}' not found within {timeout_ms}ms")]
    ElementNotFound { selector: String, timeout_ms: u64 },

    /// Matched nodes did not have the expected shape
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Any other failure inside a browser workflow
    #[error("Automation error: {0}")]
    Automation(String),

    /// Ollama connection or API errors
    #[error("Ollama error: {0}")]
    Ollama(String),

    /// Model not available
    #[error("Model '{0}' not available in Ollama. Run: ollama pull {0}")]
    ModelNotFound(String),

    /// Application launch errors
    #[error("Failed to open {app}: {reason}")]
    Launcher { app: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for Errand operations
pub type Result<T> = std::result::Result<T, ErrandError>;

impl ErrandError {
    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create a navigation timeout error
    pub fn navigation(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Navigation {
            url: url.into(),
            timeout_ms,
        }
    }

    /// Create an element-not-found error
    pub fn element_not_found(selector: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            timeout_ms,
        }
    }

    /// Create an extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a catch-all automation error
    pub fn automation(msg: impl Into<String>) -> Self {
        Self::Automation(msg.into())
    }

    /// Create an Ollama error
    pub fn ollama(msg: impl Into<String>) -> Self {
        Self::Ollama(msg.into())
    }

    /// Create an application launch error
    pub fn launcher(app: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Launcher {
            app: app.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error only means an element was missing.
    ///
    /// Workflows downgrade these to "no data" for optional selectors.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_element_not_found_is_soft() {
        assert!(ErrandError::element_not_found("#wob_tm", 2000).is_soft());
        assert!(!ErrandError::navigation("https://example.com", 30000).is_soft());
        assert!(!ErrandError::extraction("bad shape").is_soft());
        assert!(!ErrandError::launch("no chrome").is_soft());
    }

    #[test]
    fn test_display_messages() {
        let err = ErrandError::element_not_found("input#search", 500);
        assert_eq!(
            err.to_string(),
            "Element 'input#search' not found within 500ms"
        );

        let err = ErrandError::launcher("excel", "exit status 1");
        assert_eq!(err.to_string(), "Failed to open excel: exit status 1");
    }
}
