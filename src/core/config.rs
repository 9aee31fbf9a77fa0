//! Configuration management for Errand
//!
//! Supports environment variables, config files, and runtime overrides.
//! Site URLs and selectors live here so stale third-party markup can be
//! patched without a rebuild.
//!
//! Config file location: ~/.config/errand/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{ErrandError, Result};

/// Main configuration for Errand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ollama configuration
    pub ollama: OllamaConfig,
    /// Chat model configuration
    pub model: ModelConfig,
    /// Browser session configuration
    pub browser: BrowserConfig,
    /// Per-workflow site configuration
    #[serde(default)]
    pub workflows: WorkflowsConfig,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Language model used for generic chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name passed to Ollama
    /// Default: llama3
    pub chat: String,
    /// Optional system prompt sent ahead of every message
    pub system_prompt: Option<String>,
    /// Sampling temperature; the model's default when unset
    pub temperature: Option<f32>,
    /// Cap on generated tokens
    pub max_tokens: Option<u32>,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// agent-browser executable
    pub program: String,
    /// Prefix for per-request session names
    pub session_prefix: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Bound on page load settlement in ms
    pub navigation_timeout_ms: u64,
    /// Default bound on waiting for a required element in ms
    pub element_timeout_ms: u64,
    /// Delay between selector polls in ms
    pub poll_interval_ms: u64,
    /// Maximum concurrent browser sessions (0 = unbounded)
    pub max_sessions: usize,
}

/// Site settings for every workflow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowsConfig {
    #[serde(default)]
    pub tickets: TicketsConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub video: VideoConfig,
}

/// Ticket search site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketsConfig {
    pub home_url: String,
    pub city_field: String,
    pub title_field: String,
    pub results: String,
    /// Bound on the optional wait for the results list
    pub results_timeout_ms: u64,
    pub max_results: usize,
}

/// Search-engine weather panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub search_url: String,
    pub temperature: String,
    pub condition: String,
    pub location: String,
    /// Bound on each optional weather node
    pub optional_timeout_ms: u64,
}

/// Video site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub home_url: String,
    pub site_name: String,
    pub search_field: String,
    pub first_result: String,
    pub now_playing_title: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: env::var("ERRAND_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            program: env::var("ERRAND_BROWSER_PROGRAM")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_prefix: "errand".to_string(),
            headed: env::var("ERRAND_BROWSER_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            navigation_timeout_ms: 30000,
            element_timeout_ms: 30000,
            poll_interval_ms: 250,
            max_sessions: env::var("ERRAND_MAX_SESSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            home_url: "https://in.bookmyshow.com/".to_string(),
            city_field: "[placeholder=\"Search for your city\"]".to_string(),
            title_field: ".sc-jTzLTM.hQPNDY".to_string(),
            results: ".style__StyledText-sc-7o7nez-0".to_string(),
            results_timeout_ms: 5000,
            max_results: 5,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            temperature: "#wob_tm".to_string(),
            condition: "#wob_dc".to_string(),
            location: ".BBwThe".to_string(),
            optional_timeout_ms: 2000,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            home_url: "https://www.youtube.com/".to_string(),
            site_name: "YouTube".to_string(),
            search_field: "input#search".to_string(),
            first_result: "#video-title".to_string(),
            now_playing_title: ".title.style-scope.ytd-video-primary-info-renderer".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("errand")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = match Self::load_from_file() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Using default configuration: {}", e);
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Override file values with any set environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("OLLAMA_HOST") {
            self.ollama.host = host;
        }
        if let Some(port) = var("OLLAMA_PORT").and_then(|p| p.parse().ok()) {
            self.ollama.port = port;
        }
        if let Some(model) = var("ERRAND_MODEL") {
            self.model.chat = model;
        }
        if let Some(program) = var("ERRAND_BROWSER_PROGRAM") {
            self.browser.program = program;
        }
        if let Some(headed) = var("ERRAND_BROWSER_HEADED") {
            self.browser.headed = headed == "true" || headed == "1";
        }
        if let Some(max) = var("ERRAND_MAX_SESSIONS").and_then(|v| v.parse().ok()) {
            self.browser.max_sessions = max;
        }
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ErrandError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ErrandError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ErrandError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ErrandError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ErrandError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(Self::config_file(), content)
            .map_err(|e| ErrandError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.browser.navigation_timeout_ms, 30000);
        assert_eq!(config.workflows.tickets.results_timeout_ms, 5000);
        assert_eq!(config.workflows.tickets.max_results, 5);
        assert_eq!(config.workflows.video.site_name, "YouTube");
    }

    #[test]
    fn test_ollama_url() {
        let mut config = Config::default();
        config.ollama.host = "localhost".to_string();
        config.ollama.port = 11434;
        assert_eq!(config.ollama_url(), "http://localhost:11434");
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = Config::default_config_toml();
        assert!(toml_str.contains("max_sessions"));
        assert!(toml_str.contains("[workflows.weather]"));
    }

    #[test]
    fn test_partial_file_keeps_workflow_defaults() {
        let mut content = toml::to_string_pretty(&Config::default()).unwrap();
        let cut = content.find("[workflows").unwrap();
        content.truncate(cut);

        let config = Config::from_toml(&content).unwrap();
        assert_eq!(config.workflows.weather.temperature, "#wob_tm");
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::from_toml(&Config::default_config_toml()).unwrap();
        config.model.chat = "mistral".to_string();
        config.browser.max_sessions = 8;
        config.ollama.host = "file-host".to_string();
        let file_port = config.ollama.port;

        let env: HashMap<&str, &str> = [
            ("ERRAND_MODEL", "llama3.2"),
            ("ERRAND_MAX_SESSIONS", "2"),
            ("OLLAMA_PORT", "not-a-port"),
        ]
        .into_iter()
        .collect();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.model.chat, "llama3.2");
        assert_eq!(config.browser.max_sessions, 2);
        assert_eq!(config.ollama.host, "file-host");
        assert_eq!(config.ollama.port, file_port);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("ollama = 3").unwrap_err();
        assert!(matches!(err, ErrandError::Config(_)));
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("errand"));
    }
}
