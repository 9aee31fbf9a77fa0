//! Automation workflows
//!
//! Each workflow serves one intent kind and runs inside exactly one browser
//! session. Errors never leave a workflow: [`Workflow::run`] folds them into
//! a failed [`WorkflowResult`].

mod tickets;
mod video;
mod weather;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::browser::SessionManager;
use crate::core::config::WorkflowsConfig;
use crate::core::{IntentKind, Result, Slots, WorkflowResult};

pub use tickets::TicketSearch;
pub use video::VideoPlayback;
pub use weather::{WeatherLookup, WeatherReport};

/// One browser automation procedure bound to an intent kind
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Intent kind this workflow serves
    fn kind(&self) -> IntentKind;

    /// Short name for logs
    fn name(&self) -> &str;

    /// Start of the message reported on failure, e.g. "Failed to search tickets."
    fn failure_prefix(&self) -> &str;

    /// Run the automation; may fail with any browser error
    async fn execute(&self, sessions: &SessionManager, slots: &Slots) -> Result<WorkflowResult>;

    /// Run the automation and turn any error into a failed result
    async fn run(&self, sessions: &SessionManager, slots: &Slots) -> WorkflowResult {
        info!(workflow = self.name(), ?slots, "Workflow started");

        match self.execute(sessions, slots).await {
            Ok(result) => {
                info!(workflow = self.name(), success = result.success, "Workflow finished");
                result
            }
            Err(e) => {
                warn!(workflow = self.name(), "Workflow failed: {}", e);
                WorkflowResult::failure(format!("{} {}", self.failure_prefix(), e))
            }
        }
    }
}

/// The standard ticket, weather and video workflows
pub fn default_workflows(config: &WorkflowsConfig) -> Vec<Arc<dyn Workflow>> {
    vec![
        Arc::new(TicketSearch::new(config.tickets.clone())),
        Arc::new(WeatherLookup::new(config.weather.clone())),
        Arc::new(VideoPlayback::new(config.video.clone())),
    ]
}

/// Slot value, or `default` when the slot is absent or blank
pub(crate) fn slot_or(slots: &Slots, name: &str, default: &str) -> String {
    slots
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// First non-empty node text
pub(crate) fn first_text(texts: Vec<String>) -> Result<String> {
    texts
        .into_iter()
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .ok_or_else(|| crate::core::ErrandError::extraction("matched nodes have no text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_or_falls_back_on_blank() {
        let mut slots = Slots::new();
        slots.insert("city".to_string(), "  ".to_string());
        assert_eq!(slot_or(&slots, "city", "Hyderabad"), "Hyderabad");

        slots.insert("city".to_string(), " Pune ".to_string());
        assert_eq!(slot_or(&slots, "city", "Hyderabad"), "Pune");
    }

    #[test]
    fn test_first_text_skips_blank_nodes() {
        let text = first_text(vec!["".to_string(), " 30 ".to_string()]).unwrap();
        assert_eq!(text, "30");
        assert!(first_text(vec![" ".to_string()]).is_err());
    }

    #[test]
    fn test_default_workflows_cover_browser_intents() {
        let kinds: Vec<IntentKind> = default_workflows(&WorkflowsConfig::default())
            .iter()
            .map(|w| w.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                IntentKind::SearchTickets,
                IntentKind::GetWeather,
                IntentKind::PlayVideo
            ]
        );
    }
}
