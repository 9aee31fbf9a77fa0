//! Browser sessions
//!
//! A [`Session`] is one browser process plus its page, owned by a single
//! workflow invocation. [`SessionManager::with_session`] is the only way to
//! get one: it launches the browser, runs the workflow body, and closes the
//! browser exactly once no matter how the body ends.

use futures::FutureExt;
use rand::distr::{Alphanumeric, SampleString};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use crate::browser::driver::{BrowserDriver, BrowserPage};
use crate::core::config::BrowserConfig;
use crate::core::{ErrandError, Result};

/// Timing bounds applied to every session step
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub navigation_timeout: Duration,
    pub element_timeout: Duration,
    pub poll_interval: Duration,
}

impl From<&BrowserConfig> for SessionSettings {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            element_timeout: Duration::from_millis(config.element_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

/// Handle to the page of a live session.
///
/// Cloning is cheap; all clones drive the same page. Steps are awaited one
/// at a time by the workflow, never concurrently.
#[derive(Clone)]
pub struct Session {
    id: String,
    page: Arc<dyn BrowserPage>,
    settings: SessionSettings,
}

impl Session {
    /// Session name used for browser isolation
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Default bound for required elements, in ms
    pub fn element_timeout_ms(&self) -> u64 {
        self.settings.element_timeout.as_millis() as u64
    }

    /// Load a page and wait for it to settle.
    ///
    /// Fails with [`ErrandError::Navigation`] once the navigation bound passes.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let bound = self.settings.navigation_timeout;
        debug!(session = %self.id, url, "Navigating");

        match tokio::time::timeout(bound, self.page.goto(url)).await {
            Ok(result) => result,
            Err(_) => Err(ErrandError::navigation(url, bound.as_millis() as u64)),
        }
    }

    /// Poll until `selector` matches at least one node, returning their texts.
    ///
    /// Fails with [`ErrandError::ElementNotFound`] after `timeout_ms`.
    pub async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<Vec<String>> {
        let bound = Duration::from_millis(timeout_ms);

        match tokio::time::timeout(bound, self.poll_until_present(selector)).await {
            Ok(result) => result,
            Err(_) => Err(ErrandError::element_not_found(selector, timeout_ms)),
        }
    }

    /// Wait for `selector` and apply `extract` to the matched node texts
    pub async fn wait_and_extract<T, F>(
        &self,
        selector: &str,
        timeout_ms: u64,
        extract: F,
    ) -> Result<T>
    where
        F: FnOnce(Vec<String>) -> Result<T>,
    {
        let texts = self.wait_for(selector, timeout_ms).await?;
        extract(texts)
    }

    /// Like [`Session::wait_and_extract`], but a missing element yields `None`
    pub async fn wait_and_extract_optional<T, F>(
        &self,
        selector: &str,
        timeout_ms: u64,
        extract: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(Vec<String>) -> Result<T>,
    {
        match self.wait_and_extract(selector, timeout_ms, extract).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_soft() => {
                debug!(session = %self.id, selector, "Optional element missing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Wait for an input, then type into it
    pub async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        self.wait_for(selector, self.element_timeout_ms()).await?;
        self.page.type_text(selector, text).await
    }

    /// Press a key on the focused element
    pub async fn press(&self, key: &str) -> Result<()> {
        self.page.press(key).await
    }

    /// Wait for an element, then click it
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.wait_for(selector, self.element_timeout_ms()).await?;
        self.page.click(selector).await
    }

    async fn poll_until_present(&self, selector: &str) -> Result<Vec<String>> {
        loop {
            // Queries can fail while the page is mid-transition; keep polling
            match self.page.query_texts(selector).await {
                Ok(texts) if !texts.is_empty() => return Ok(texts),
                Ok(_) => {}
                Err(e) => debug!(session = %self.id, selector, "Query failed, retrying: {}", e),
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}

/// Hands out one fresh browser session per workflow invocation
pub struct SessionManager {
    driver: Arc<dyn BrowserDriver>,
    settings: SessionSettings,
    session_prefix: String,
    /// Caps live sessions; `None` means unbounded
    limiter: Option<Arc<Semaphore>>,
}

impl SessionManager {
    /// Create a manager from browser configuration
    pub fn new(driver: Arc<dyn BrowserDriver>, config: &BrowserConfig) -> Self {
        let limiter = (config.max_sessions > 0)
            .then(|| Arc::new(Semaphore::new(config.max_sessions)));

        Self {
            driver,
            settings: SessionSettings::from(config),
            session_prefix: config.session_prefix.clone(),
            limiter,
        }
    }

    /// Replace the timing bounds
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The underlying browser driver
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    /// Free session slots, or `None` when unbounded
    pub fn available_slots(&self) -> Option<usize> {
        self.limiter.as_ref().map(|s| s.available_permits())
    }

    /// Run `body` against a freshly launched session.
    ///
    /// The browser is closed after `body` finishes, whether it returned
    /// `Ok`, returned `Err`, or panicked. A panic is reported as
    /// [`ErrandError::Automation`]. Launch failures are reported as
    /// [`ErrandError::Launch`] and `body` is not run.
    pub async fn with_session<T, F, Fut>(&self, body: F) -> Result<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let permit = match &self.limiter {
            Some(limiter) => Some(
                limiter
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| ErrandError::launch("session limiter closed"))?,
            ),
            None => None,
        };

        let id = self.next_session_id();
        let page = self.driver.launch(&id).await.map_err(|e| match e {
            ErrandError::Launch(_) => e,
            other => ErrandError::launch(other.to_string()),
        })?;
        info!(session = %id, driver = self.driver.name(), "Browser session started");

        let guard = SessionGuard {
            id: id.clone(),
            page: Some(page.clone()),
            _permit: permit,
        };

        let session = Session {
            id,
            page,
            settings: self.settings,
        };

        let outcome = AssertUnwindSafe(body(session)).catch_unwind().await;
        guard.release().await;

        match outcome {
            Ok(result) => result,
            Err(panic) => Err(ErrandError::automation(format!(
                "workflow panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    fn next_session_id(&self) -> String {
        let suffix = Alphanumeric.sample_string(&mut rand::rng(), 8);
        format!("{}-{}", self.session_prefix, suffix.to_lowercase())
    }
}

/// Closes the browser exactly once.
///
/// `release` is the normal path; `Drop` covers a scope abandoned mid-await.
struct SessionGuard {
    id: String,
    page: Option<Arc<dyn BrowserPage>>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl SessionGuard {
    async fn release(mut self) {
        if let Some(page) = self.page.take() {
            close_page(&self.id, page).await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };

        let id = self.id.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { close_page(&id, page).await });
            }
            Err(_) => warn!(session = %id, "No runtime left to close browser session"),
        }
    }
}

async fn close_page(id: &str, page: Arc<dyn BrowserPage>) {
    match page.close().await {
        Ok(()) => info!(session = %id, "Browser session closed"),
        Err(e) => warn!(session = %id, "Failed to close browser session: {}", e),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
