//! Ticket search workflow

use async_trait::async_trait;
use serde_json::json;

use crate::browser::SessionManager;
use crate::core::config::TicketsConfig;
use crate::core::{IntentKind, Result, Slots, WorkflowResult};
use crate::intent::slots::{self, defaults};
use crate::workflows::{slot_or, Workflow};

/// Searches the ticket site for a movie in a city
pub struct TicketSearch {
    config: TicketsConfig,
}

impl TicketSearch {
    pub fn new(config: TicketsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Workflow for TicketSearch {
    fn kind(&self) -> IntentKind {
        IntentKind::SearchTickets
    }

    fn name(&self) -> &str {
        "ticket_search"
    }

    fn failure_prefix(&self) -> &str {
        "Failed to search tickets."
    }

    async fn execute(&self, sessions: &SessionManager, slots: &Slots) -> Result<WorkflowResult> {
        let movie = slot_or(slots, slots::MOVIE, defaults::MOVIE);
        let city = slot_or(slots, slots::CITY, defaults::CITY);
        let date = slots.get(slots::DATE).cloned();

        let site = &self.config;
        let (movie_name, city_name) = (movie.as_str(), city.as_str());

        let results = sessions
            .with_session(|session| async move {
                session.navigate(&site.home_url).await?;

                session.type_into(&site.city_field, city_name).await?;
                session.press("Enter").await?;

                session.click(&site.title_field).await?;
                session.type_into(&site.title_field, movie_name).await?;
                session.press("Enter").await?;

                // An empty result list is a valid answer, not a failure
                let found = session
                    .wait_and_extract_optional(&site.results, site.results_timeout_ms, |texts| {
                        Ok(texts
                            .into_iter()
                            .map(|t| t.trim().to_string())
                            .filter(|t| !t.is_empty())
                            .take(site.max_results)
                            .collect::<Vec<_>>())
                    })
                    .await?;

                Ok(found.unwrap_or_default())
            })
            .await?;

        let message = format!(
            "Found {} results for {} in {}",
            results.len(),
            movie,
            city
        );
        let listed = if results.is_empty() {
            vec!["No results found".to_string()]
        } else {
            results
        };

        Ok(WorkflowResult::success_with_payload(
            message,
            json!({
                "movie": movie,
                "city": city,
                "date": date,
                "results": listed,
            }),
        ))
    }
}
