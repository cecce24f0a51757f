//! TTS mounting: synthesize speech, upload it, compose it onto a video.
//!
//! The three steps run strictly in order and the chain stops at the first
//! failure, so a failed upload never produces a mount request. Each step's
//! phase stays observable after the run for the caller to surface.

use crate::api::ApiClient;
use crate::phase::Tracker;
use crate::workflows::WorkflowError;

#[derive(Debug)]
pub struct MountPipeline {
    pub speech: Tracker<Vec<u8>>,
    pub upload: Tracker<String>,
    pub mount: Tracker<String>,
}

impl MountPipeline {
    pub fn new() -> Self {
        Self {
            speech: Tracker::new("tts"),
            upload: Tracker::new("upload-audio"),
            mount: Tracker::new("mount-audio"),
        }
    }

    /// Runs the full chain and returns the composited video URL.
    pub async fn run(
        &mut self,
        api: &ApiClient,
        video_url: &str,
        text: &str,
        voice: &str,
    ) -> Result<String, WorkflowError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self.speech.reject("Narration text must not be empty").into());
        }

        let audio = self.speech.run(api.synthesize_speech(text, voice)).await?;
        let audio_url = self
            .upload
            .run(api.upload_audio(audio, "narration.mp3"))
            .await?;
        let mounted = self
            .mount
            .run(api.mount_audio(video_url, &audio_url))
            .await?;
        Ok(mounted)
    }
}

impl Default for MountPipeline {
    fn default() -> Self {
        Self::new()
    }
}
