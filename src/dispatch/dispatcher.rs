//! Request dispatcher
//!
//! Routes each inbound message to a workflow, the application launcher, or
//! the language model, and always answers with a non-empty reply.

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::browser::{AgentBrowserDriver, SessionManager};
use crate::core::{Config, Intent, IntentKind, Message, Result};
use crate::dispatch::launcher::{AppLauncher, SystemLauncher};
use crate::intent::slots;
use crate::intent::IntentExtractor;
use crate::llm::{GenerateOptions, LLMProvider, OllamaClient};
use crate::workflows::{default_workflows, Workflow};

/// Reply for a blank message
pub const EMPTY_MESSAGE_REPLY: &str = "Error: A message is required.";
/// Reply when the language model cannot answer
pub const LLM_ERROR_REPLY: &str = "Error: Could not get a response from the AI engine.";
/// Reply when handling broke unexpectedly
pub const GENERIC_ERROR_REPLY: &str = "Sorry, something went wrong while handling your request.";

/// Reachability of the external collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendStatus {
    pub llm_reachable: bool,
    pub model_available: bool,
    pub browser_available: bool,
}

/// Maps each message to exactly one handler attempt
pub struct Dispatcher {
    extractor: IntentExtractor,
    sessions: Arc<SessionManager>,
    workflows: HashMap<IntentKind, Arc<dyn Workflow>>,
    launcher: Arc<dyn AppLauncher>,
    llm: Arc<dyn LLMProvider>,
    model: String,
    system_prompt: Option<String>,
    options: Option<GenerateOptions>,
}

impl Dispatcher {
    /// Create a dispatcher with no workflows registered
    pub fn new(
        sessions: Arc<SessionManager>,
        llm: Arc<dyn LLMProvider>,
        launcher: Arc<dyn AppLauncher>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            extractor: IntentExtractor::new(),
            sessions,
            workflows: HashMap::new(),
            launcher,
            llm,
            model: model.into(),
            system_prompt: None,
            options: None,
        }
    }

    /// Build the standard dispatcher: Ollama, agent-browser, system launcher
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = Arc::new(OllamaClient::from_config(config)?);
        let driver = Arc::new(AgentBrowserDriver::from_config(&config.browser));
        let sessions = Arc::new(SessionManager::new(driver, &config.browser));

        let mut dispatcher = Self::new(
            sessions,
            llm,
            Arc::new(SystemLauncher::new()),
            config.model.chat.clone(),
        );
        dispatcher.system_prompt = config.model.system_prompt.clone();
        if config.model.temperature.is_some() || config.model.max_tokens.is_some() {
            dispatcher.options = Some(GenerateOptions {
                temperature: config.model.temperature,
                max_tokens: config.model.max_tokens,
                stop: None,
            });
        }

        for workflow in default_workflows(&config.workflows) {
            dispatcher = dispatcher.with_workflow(workflow);
        }

        Ok(dispatcher)
    }

    /// Register a workflow for its intent kind, replacing any previous one
    pub fn with_workflow(mut self, workflow: Arc<dyn Workflow>) -> Self {
        self.workflows.insert(workflow.kind(), workflow);
        self
    }

    /// Send this system prompt ahead of generic chat messages
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Pass generation options with every chat request
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Chat model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Extract the intent without acting on it
    pub fn extract(&self, text: &str) -> Intent {
        self.extractor.extract(text)
    }

    /// Handle one message and return the reply
    pub async fn handle(&self, text: &str) -> String {
        self.route(text).await.1
    }

    /// Handle one message, returning the chosen intent alongside the reply
    pub async fn route(&self, text: &str) -> (Intent, String) {
        let intent = self.extractor.extract(text);

        if text.trim().is_empty() {
            return (intent, EMPTY_MESSAGE_REPLY.to_string());
        }

        info!(kind = %intent.kind(), "Dispatching request");

        let reply = match AssertUnwindSafe(self.reply_for(&intent, text))
            .catch_unwind()
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                warn!(kind = %intent.kind(), "Handler produced an empty reply");
                GENERIC_ERROR_REPLY.to_string()
            }
            Err(_) => {
                error!(kind = %intent.kind(), "Handler panicked");
                GENERIC_ERROR_REPLY.to_string()
            }
        };

        (intent, reply)
    }

    /// Check which collaborators are reachable
    pub async fn check_backends(&self) -> BackendStatus {
        let llm_reachable = self.llm.list_models().await.is_ok();
        let model_available =
            llm_reachable && self.llm.is_model_available(&self.model).await.unwrap_or(false);

        BackendStatus {
            llm_reachable,
            model_available,
            browser_available: self.sessions.driver().is_available().await,
        }
    }

    async fn reply_for(&self, intent: &Intent, text: &str) -> String {
        match intent.kind() {
            IntentKind::OpenApplication => {
                let app = intent.slot(slots::APP_NAME).unwrap_or_default();
                if app.is_empty() {
                    return "Please tell me which application to open.".to_string();
                }
                match self.launcher.open(app).await {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("Application launch failed: {}", e);
                        e.to_string()
                    }
                }
            }
            IntentKind::GenericChat => self.chat(text).await,
            kind => match self.workflows.get(&kind) {
                Some(workflow) => workflow.run(&self.sessions, intent.slots()).await.message,
                None => format!("No workflow is registered for {}.", kind),
            },
        }
    }

    async fn chat(&self, text: &str) -> String {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(Message::system(prompt.clone()));
        }
        messages.push(Message::user(text));

        match self.llm.chat(&self.model, &messages, self.options.clone()).await {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => {
                warn!(model = %self.model, "Language model returned an empty reply");
                LLM_ERROR_REPLY.to_string()
            }
            Err(e) => {
                warn!(model = %self.model, "Language model call failed: {}", e);
                LLM_ERROR_REPLY.to_string()
            }
        }
    }
}
