//! Browser driver traits
//!
//! The seam between workflows and whatever actually drives a browser.
//! Selectors are plain CSS strings; extracted data is node text content.

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::Result;

/// Starts browser processes
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Start a browser process with one open page, isolated under `session_id`
    async fn launch(&self, session_id: &str) -> Result<Arc<dyn BrowserPage>>;

    /// Check whether the driver can launch browsers at all
    async fn is_available(&self) -> bool;

    /// Get the driver name
    fn name(&self) -> &str;
}

/// One page inside a launched browser
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Load a URL and wait for network activity to settle
    async fn goto(&self, url: &str) -> Result<()>;

    /// Text content of every node matching `selector`, empty when none match
    async fn query_texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Type text into the first node matching `selector`
    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Press a keyboard key on the focused element
    async fn press(&self, key: &str) -> Result<()>;

    /// Click the first node matching `selector`
    async fn click(&self, selector: &str) -> Result<()>;

    /// Terminate the browser process
    async fn close(&self) -> Result<()>;
}
