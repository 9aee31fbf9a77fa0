//! Video playback workflow

use async_trait::async_trait;
use serde_json::json;

use crate::browser::SessionManager;
use crate::core::config::VideoConfig;
use crate::core::{IntentKind, Result, Slots, WorkflowResult};
use crate::intent::slots::{self, defaults};
use crate::workflows::{first_text, slot_or, Workflow};

/// Searches the video site and starts the first hit
pub struct VideoPlayback {
    config: VideoConfig,
}

impl VideoPlayback {
    pub fn new(config: VideoConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Workflow for VideoPlayback {
    fn kind(&self) -> IntentKind {
        IntentKind::PlayVideo
    }

    fn name(&self) -> &str {
        "video_playback"
    }

    fn failure_prefix(&self) -> &str {
        "Failed to play video."
    }

    async fn execute(&self, sessions: &SessionManager, slots: &Slots) -> Result<WorkflowResult> {
        let query = slot_or(slots, slots::QUERY, defaults::QUERY);

        let site = &self.config;
        let search = query.as_str();

        let title = sessions
            .with_session(|session| async move {
                session.navigate(&site.home_url).await?;

                session.type_into(&site.search_field, search).await?;
                session.press("Enter").await?;

                session.click(&site.first_result).await?;

                let bound = session.element_timeout_ms();
                session
                    .wait_and_extract(&site.now_playing_title, bound, first_text)
                    .await
            })
            .await?;

        Ok(WorkflowResult::success_with_payload(
            format!("Playing \"{}\" on {}", title, site.site_name),
            json!({ "videoTitle": title }),
        ))
    }
}
