//! Weather lookup through a search-engine weather panel

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::browser::SessionManager;
use crate::core::config::WeatherConfig;
use crate::core::{ErrandError, IntentKind, Result, Slots, WorkflowResult};
use crate::intent::slots::{self, defaults};
use crate::workflows::{first_text, slot_or, Workflow};

/// Values scraped from the weather panel; each may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temp: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
}

/// Looks up the weather for a location
pub struct WeatherLookup {
    config: WeatherConfig,
}

impl WeatherLookup {
    pub fn new(config: WeatherConfig) -> Self {
        Self { config }
    }

    /// Search URL for "weather in {location}"
    pub fn query_url(&self, location: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.config.search_url,
            &[("q", format!("weather in {}", location))],
        )
        .map_err(|e| ErrandError::config(format!("Invalid weather search URL: {}", e)))
    }
}

#[async_trait]
impl Workflow for WeatherLookup {
    fn kind(&self) -> IntentKind {
        IntentKind::GetWeather
    }

    fn name(&self) -> &str {
        "weather_lookup"
    }

    fn failure_prefix(&self) -> &str {
        "Failed to get weather information."
    }

    async fn execute(&self, sessions: &SessionManager, slots: &Slots) -> Result<WorkflowResult> {
        let location = slot_or(slots, slots::LOCATION, defaults::LOCATION);
        let url = self.query_url(&location)?;

        let panel = &self.config;
        let target = url.as_str();

        let report = sessions
            .with_session(|session| async move {
                session.navigate(target).await?;

                let bound = panel.optional_timeout_ms;
                Ok(WeatherReport {
                    temp: session
                        .wait_and_extract_optional(&panel.temperature, bound, panel_text)
                        .await?
                        .flatten(),
                    condition: session
                        .wait_and_extract_optional(&panel.condition, bound, panel_text)
                        .await?
                        .flatten(),
                    location: session
                        .wait_and_extract_optional(&panel.location, bound, panel_text)
                        .await?
                        .flatten(),
                })
            })
            .await?;

        let message = format!(
            "Weather in {}: {}°C, {}",
            location,
            report.temp.as_deref().unwrap_or("unknown"),
            report.condition.as_deref().unwrap_or("unknown"),
        );

        Ok(WorkflowResult::success_with_payload(
            message,
            serde_json::to_value(&report)?,
        ))
    }
}

/// Panel fields are optional; a node with blank text counts as missing
fn panel_text(texts: Vec<String>) -> Result<Option<String>> {
    Ok(first_text(texts).ok())
}
