//! agent-browser driver - wraps the agent-browser CLI
//!
//! Every session maps to one `--session` name, so concurrent requests get
//! separate browser processes.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

use crate::browser::driver::{BrowserDriver, BrowserPage};
use crate::core::config::BrowserConfig;
use crate::core::{ErrandError, Result};

/// Launches pages through the agent-browser CLI
pub struct AgentBrowserDriver {
    /// Executable name or path
    program: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Reported when a page never settles
    navigation_timeout_ms: u64,
}

impl AgentBrowserDriver {
    /// Create a new driver for the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            headed: false,
            navigation_timeout_ms: 30_000,
        }
    }

    /// Create a driver from browser configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        let mut driver = Self::new(config.program.clone());
        driver.set_headed(config.headed);
        driver.navigation_timeout_ms = config.navigation_timeout_ms;
        driver
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }
}

impl Default for AgentBrowserDriver {
    fn default() -> Self {
        Self::new("agent-browser")
    }
}

#[async_trait]
impl BrowserDriver for AgentBrowserDriver {
    async fn launch(&self, session_id: &str) -> Result<Arc<dyn BrowserPage>> {
        let page = AgentBrowserPage {
            program: self.program.clone(),
            session_name: session_id.to_string(),
            headed: self.headed,
            navigation_timeout_ms: self.navigation_timeout_ms,
        };

        // agent-browser starts the daemon lazily on the first command
        match page.run_command(&["open", "about:blank"]).await {
            Ok(_) => {}
            Err(ErrandError::AgentBrowserNotFound) => return Err(ErrandError::AgentBrowserNotFound),
            Err(e) => {
                // The daemon may already be up for this session
                if let Err(close_err) = page.run_command(&["close"]).await {
                    debug!(session = session_id, "Close after failed launch: {}", close_err);
                }
                return Err(ErrandError::launch(e.to_string()));
            }
        }

        Ok(Arc::new(page))
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "agent-browser"
    }
}

/// A page controlled through one agent-browser session
pub struct AgentBrowserPage {
    program: String,
    /// Session name for isolation
    session_name: String,
    headed: bool,
    navigation_timeout_ms: u64,
}

impl AgentBrowserPage {
    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(session = %self.session_name, ?args, "agent-browser");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ErrandError::AgentBrowserNotFound
            } else {
                ErrandError::automation(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ErrandError::automation(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl BrowserPage for AgentBrowserPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;

        if let Err(e) = self.run_command(&["wait", "--load", "networkidle"]).await {
            debug!(session = %self.session_name, "Page never settled at {}: {}", url, e);
            return Err(ErrandError::navigation(url, self.navigation_timeout_ms));
        }

        Ok(())
    }

    async fn query_texts(&self, selector: &str) -> Result<Vec<String>> {
        let script = text_query_script(selector)?;
        let output = self.run_command(&["eval", &script]).await?;
        parse_eval_texts(&output)
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.run_command(&["type", selector, text]).await?;
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<()> {
        self.run_command(&["press", key]).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.run_command(&["click", selector]).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await?;
        Ok(())
    }
}

/// Script returning the trimmed text of every node matching `selector` as JSON
fn text_query_script(selector: &str) -> Result<String> {
    let literal = serde_json::to_string(selector)?;
    Ok(format!(
        "JSON.stringify(Array.from(document.querySelectorAll({})).map(e => (e.textContent || '').trim()))",
        literal
    ))
}

/// Decode the printed result of the text query script.
///
/// The CLI may print the JSON directly, as a quoted string, or wrapped in a
/// `{"data": {"result": ...}}` envelope.
fn parse_eval_texts(output: &str) -> Result<Vec<String>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
        return Ok(Vec::new());
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| ErrandError::extraction(format!("Unreadable eval output: {}", e)))?;
    texts_from_value(value)
}

fn texts_from_value(value: serde_json::Value) -> Result<Vec<String>> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(inner) => parse_eval_texts(&inner),
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()),
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                match data {
                    Value::Object(mut inner) => match inner.remove("result") {
                        Some(result) => texts_from_value(result),
                        None => texts_from_value(Value::Object(inner)),
                    },
                    other => texts_from_value(other),
                }
            } else if let Some(result) = map.remove("result") {
                texts_from_value(result)
            } else {
                Err(ErrandError::extraction(
                    "eval output has no result field".to_string(),
                ))
            }
        }
        other => Err(ErrandError::extraction(format!(
            "Expected a list of texts, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_creation() {
        let driver = AgentBrowserDriver::new("agent-browser");
        assert_eq!(driver.program, "agent-browser");
        assert!(!driver.headed);
    }

    #[test]
    fn test_query_script_escapes_selector() {
        let script = text_query_script("[placeholder=\"Search for your city\"]").unwrap();
        assert!(script.contains(r#"querySelectorAll("[placeholder=\"Search for your city\"]")"#));
    }

    #[test]
    fn test_parse_plain_array() {
        let texts = parse_eval_texts(r#"["Dune", "Dune: Part Two"]"#).unwrap();
        assert_eq!(texts, vec!["Dune", "Dune: Part Two"]);
    }

    #[test]
    fn test_parse_quoted_json() {
        let texts = parse_eval_texts(r#""[\"30\"]""#).unwrap();
        assert_eq!(texts, vec!["30"]);
    }

    #[test]
    fn test_parse_json_envelope() {
        let texts =
            parse_eval_texts(r#"{"success":true,"data":{"result":"[\"Sunny\"]"}}"#).unwrap();
        assert_eq!(texts, vec!["Sunny"]);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_eval_texts("").unwrap().is_empty());
        assert!(parse_eval_texts("[]").unwrap().is_empty());
        assert!(parse_eval_texts("null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unexpected_shape() {
        let err = parse_eval_texts("42").unwrap_err();
        assert!(matches!(err, ErrandError::Extraction(_)));
    }

    /// Writes a stand-in agent-browser that logs its arguments and fails
    /// every command containing `fail_on`.
    #[cfg(unix)]
    fn scripted_cli(name: &str, fail_on: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("errand-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let log = dir.join("calls.log");
        let program = dir.join("agent-browser");
        let _ = std::fs::remove_file(&log);

        std::fs::write(
            &program,
            format!(
                "#!/bin/sh\necho \"$*\" >> '{}'\ncase \"$*\" in\n  *'{}'*) echo 'timed out' >&2; exit 1;;\nesac\nexit 0\n",
                log.display(),
                fail_on
            ),
        )
        .unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
        (program, log)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unsettled_page_is_navigation_error() {
        let (program, _log) = scripted_cli("settle", "wait --load");
        let mut config = BrowserConfig::default();
        config.program = program.to_string_lossy().into_owned();
        config.navigation_timeout_ms = 1234;
        let driver = AgentBrowserDriver::from_config(&config);

        let page = driver.launch("errand-settle").await.unwrap();
        let err = page.goto("https://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            ErrandError::Navigation { ref url, timeout_ms: 1234 } if url == "https://example.com"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_launch_closes_session() {
        let (program, log) = scripted_cli("launch", "open about:blank");
        let driver = AgentBrowserDriver::new(program.to_string_lossy());

        let err = driver.launch("errand-launch").await.err().unwrap();

        assert!(matches!(err, ErrandError::Launch(_)));
        let calls = std::fs::read_to_string(log).unwrap();
        assert!(calls.lines().any(|l| l == "--session errand-launch close"), "{}", calls);
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let driver = AgentBrowserDriver::new("errand-test-no-such-binary");
        assert!(!driver.is_available().await);

        let err = driver.launch("errand-test").await.err().unwrap();
        assert!(matches!(err, ErrandError::AgentBrowserNotFound));
    }
}
