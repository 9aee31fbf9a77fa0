//! Scripted in-memory browser for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::browser::driver::{BrowserDriver, BrowserPage};
use crate::core::{ErrandError, Result};

/// Counters shared between a fake driver and the test
#[derive(Default)]
pub(crate) struct FakeStats {
    pub launches: AtomicUsize,
    pub releases: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub queries: AtomicUsize,
    pub actions: Mutex<Vec<String>>,
}

impl FakeStats {
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

#[derive(Clone, Default)]
struct Script {
    nodes: HashMap<String, Vec<String>>,
    goto_delay: Option<Duration>,
    goto_error: Option<String>,
    failing_queries: usize,
    fail_launch: bool,
}

/// Browser driver whose pages answer from a fixed selector table
#[derive(Clone)]
pub(crate) struct FakeDriver {
    script: Arc<Script>,
    stats: Arc<FakeStats>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Script::default()),
            stats: Arc::new(FakeStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<FakeStats> {
        self.stats.clone()
    }

    pub fn with_nodes(self, selector: &str, texts: &[&str]) -> Self {
        self.edit(|script| {
            script.nodes.insert(
                selector.to_string(),
                texts.iter().map(|t| t.to_string()).collect(),
            );
        })
    }

    pub fn with_goto_delay(self, delay: Duration) -> Self {
        self.edit(|script| script.goto_delay = Some(delay))
    }

    pub fn failing_goto(self, reason: &str) -> Self {
        self.edit(|script| script.goto_error = Some(reason.to_string()))
    }

    /// The first `count` selector queries fail
    pub fn with_failing_queries(self, count: usize) -> Self {
        self.edit(|script| script.failing_queries = count)
    }

    pub fn failing_launch(self) -> Self {
        self.edit(|script| script.fail_launch = true)
    }

    fn edit(self, change: impl FnOnce(&mut Script)) -> Self {
        let mut script = Arc::unwrap_or_clone(self.script);
        change(&mut script);
        Self {
            script: Arc::new(script),
            stats: self.stats,
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn launch(&self, session_id: &str) -> Result<Arc<dyn BrowserPage>> {
        if self.script.fail_launch {
            return Err(ErrandError::AgentBrowserNotFound);
        }

        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);
        self.stats.record(format!("launch {}", session_id));

        Ok(Arc::new(FakePage {
            script: self.script.clone(),
            stats: self.stats.clone(),
        }))
    }

    async fn is_available(&self) -> bool {
        !self.script.fail_launch
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakePage {
    script: Arc<Script>,
    stats: Arc<FakeStats>,
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.stats.record(format!("goto {}", url));
        if let Some(delay) = self.script.goto_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script.goto_error {
            Some(reason) => Err(ErrandError::automation(reason.clone())),
            None => Ok(()),
        }
    }

    async fn query_texts(&self, selector: &str) -> Result<Vec<String>> {
        let attempt = self.stats.queries.fetch_add(1, Ordering::SeqCst);
        if attempt < self.script.failing_queries {
            return Err(ErrandError::automation("Execution context was destroyed"));
        }
        Ok(self.script.nodes.get(selector).cloned().unwrap_or_default())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.stats.record(format!("type {} {}", selector, text));
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.stats.record(format!("press {}", key));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.stats.record(format!("click {}", selector));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        self.stats.record("close".to_string());
        Ok(())
    }
}
