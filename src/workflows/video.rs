//! AI video generation from a prompt plus generation settings.

use crate::api::{ApiClient, GeneratedVideo};
use crate::models::GenerateConfig;
use crate::phase::Tracker;
use crate::workflows::WorkflowError;

#[derive(Debug)]
pub struct VideoFlow {
    pub generation: Tracker<GeneratedVideo>,
}

impl VideoFlow {
    pub fn new() -> Self {
        Self {
            generation: Tracker::new("generate-video"),
        }
    }

    /// Submits the prompt and settings to the generation endpoint. An empty
    /// prompt is rejected before any request.
    pub async fn generate(
        &mut self,
        api: &ApiClient,
        prompt: &str,
        config: &GenerateConfig,
    ) -> Result<GeneratedVideo, WorkflowError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(self.generation.reject("Prompt must not be empty").into());
        }

        let video = self
            .generation
            .run(api.generate_video(prompt, config))
            .await?;
        Ok(video)
    }
}

impl Default for VideoFlow {
    fn default() -> Self {
        Self::new()
    }
}
