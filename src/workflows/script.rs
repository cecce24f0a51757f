//! Script generation: prompt in, script out, history kept server-side.

use tracing::warn;

use crate::api::ApiClient;
use crate::phase::Tracker;
use crate::workflows::WorkflowError;

/// Drives one script generation attempt and the follow-up history append.
#[derive(Debug)]
pub struct ScriptFlow {
    pub generation: Tracker<String>,
}

impl ScriptFlow {
    pub fn new() -> Self {
        Self {
            generation: Tracker::new("generate-script"),
        }
    }

    /// Generates a script for the prompt. An empty prompt is rejected before
    /// any request. On success the prompt/script pair is appended to the
    /// user's history; a failed append is logged but does not fail the
    /// generation the user already received.
    pub async fn generate(
        &mut self,
        api: &ApiClient,
        user_id: &str,
        prompt: &str,
    ) -> Result<String, WorkflowError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(self.generation.reject("Prompt must not be empty").into());
        }

        let script = self.generation.run(api.generate_script(prompt)).await?;

        if let Err(err) = api.append_script_history(user_id, prompt, &script).await {
            warn!("failed to append script history: {err}");
        }

        Ok(script)
    }
}

impl Default for ScriptFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Deletes one history item by id.
pub async fn delete_history_item(api: &ApiClient, id: &str) -> Result<(), WorkflowError> {
    api.delete_script_history(id).await.map_err(WorkflowError::from)
}

/// Clears the user's entire history.
pub async fn clear_history(api: &ApiClient, user_id: &str) -> Result<(), WorkflowError> {
    api.clear_script_history(user_id)
        .await
        .map_err(WorkflowError::from)
}
