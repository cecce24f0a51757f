use std::fmt;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::models::{
    GenerateConfig, JobStatus, Platform, ScriptHistoryItem, StatsSummary, TimePoint, Video,
};

/// Errors that can occur while talking to the STORIQ backend.
#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    UnexpectedStatus { status: StatusCode, body: String },
}

impl ApiError {
    /// Best-effort human message. Non-2xx bodies are probed for a
    /// `message`/`error` field; anything unrecognizable falls back to a
    /// generic string.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http(err) => err.to_string(),
            ApiError::UnexpectedStatus { body, .. } => {
                serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|value| {
                        value
                            .get("message")
                            .or_else(|| value.get("error"))
                            .and_then(|m| m.as_str())
                            .map(str::to_owned)
                    })
                    .unwrap_or_else(|| "Unknown error".to_string())
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "http error: {err}"),
            ApiError::UnexpectedStatus { status, body } => {
                write!(f, "unexpected status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Http(value)
    }
}

/// A freshly generated video, as returned by the generation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedVideo {
    #[serde(rename = "s3Url")]
    pub s3_url: String,
    #[serde(rename = "s3Key")]
    pub s3_key: String,
}

/// Job handle returned by the crop endpoint and its status poll.
#[derive(Debug, Clone, Deserialize)]
pub struct CropJob {
    pub job_id: String,
    pub status: JobStatus,
}

/// One selectable TTS voice.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
}

/// Connection state for the publishing platforms.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AuthStatus {
    pub youtube: bool,
    pub instagram: bool,
}

impl AuthStatus {
    pub fn is_connected(&self, platform: Platform) -> bool {
        match platform {
            Platform::YouTube => self.youtube,
            Platform::Instagram => self.instagram,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptResponse {
    script: String,
}

#[derive(Debug, Deserialize)]
struct UploadAudioResponse {
    #[serde(rename = "audioUrl")]
    audio_url: String,
}

#[derive(Debug, Deserialize)]
struct MountResponse {
    #[serde(rename = "mountedUrl")]
    mounted_url: String,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(rename = "authUrl")]
    auth_url: String,
}

/// Async client that knows how to hit the STORIQ backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a new client targeting the provided base URL.
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            auth_token,
        })
    }

    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generates a script from a prompt.
    pub async fn generate_script(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/generate-script", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "prompt": prompt,
        }));
        let response = self.authorized(request).send().await?;
        let body: ScriptResponse = Self::expect_json(response).await?;
        Ok(body.script)
    }

    /// Submits a prompt plus generation settings to the AI video endpoint.
    pub async fn generate_video(
        &self,
        prompt: &str,
        config: &GenerateConfig,
    ) -> Result<GeneratedVideo, ApiError> {
        let url = format!("{}/ai/generate-video", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "prompt": prompt,
            "config": config,
        }));
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Requests a server-side crop of `[start, end]` and returns the job handle.
    pub async fn crop_video(
        &self,
        video_url: &str,
        start: f64,
        end: f64,
        user_id: &str,
    ) -> Result<CropJob, ApiError> {
        let url = format!("{}/api/video/crop", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "videoUrl": video_url,
            "start": start,
            "end": end,
            "userId": user_id,
        }));
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Polls the status of a crop job.
    pub async fn crop_status(&self, job_id: &str) -> Result<CropJob, ApiError> {
        let url = format!("{}/api/video/crop/status", self.base_url);
        let request = self.http.get(url).query(&[("jobId", job_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Deletes a stored video by its storage key.
    pub async fn delete_video(&self, s3_key: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/delete-video", self.base_url);
        let request = self.http.delete(url).json(&serde_json::json!({
            "s3Key": s3_key,
        }));
        let response = self.authorized(request).send().await?;
        Self::expect_ok(response).await
    }

    /// Lists the user's videos.
    pub async fn list_videos(&self, user_id: &str) -> Result<Vec<Video>, ApiError> {
        let url = format!("{}/api/videos", self.base_url);
        let request = self.http.get(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Fetches the user's script generation history.
    pub async fn script_history(&self, user_id: &str) -> Result<Vec<ScriptHistoryItem>, ApiError> {
        let url = format!("{}/api/scripts/history", self.base_url);
        let request = self.http.get(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Appends one prompt/script pair to the history.
    pub async fn append_script_history(
        &self,
        user_id: &str,
        prompt: &str,
        script: &str,
    ) -> Result<ScriptHistoryItem, ApiError> {
        let url = format!("{}/api/scripts/history", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "userId": user_id,
            "prompt": prompt,
            "script": script,
        }));
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Deletes one history item by id.
    pub async fn delete_script_history(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/scripts/history/{id}", self.base_url);
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::expect_ok(response).await
    }

    /// Clears the user's entire history.
    pub async fn clear_script_history(&self, user_id: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/scripts/history", self.base_url);
        let request = self.http.delete(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_ok(response).await
    }

    /// Fetches the aggregate stats counters.
    pub async fn stats_summary(&self, user_id: &str) -> Result<StatsSummary, ApiError> {
        let url = format!("{}/api/stats/summary", self.base_url);
        let request = self.http.get(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Fetches the per-day analytics series.
    pub async fn stats_timeseries(&self, user_id: &str) -> Result<Vec<TimePoint>, ApiError> {
        let url = format!("{}/api/stats/timeseries", self.base_url);
        let request = self.http.get(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Synthesizes speech for the given text and returns the raw audio bytes.
    pub async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/video-tts/tts", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "text": text,
            "voice": voice,
        }));
        let response = self.authorized(request).send().await?;

        if response.status().is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(Self::status_error(response).await)
        }
    }

    /// Lists the available TTS voices.
    pub async fn list_voices(&self) -> Result<Vec<Voice>, ApiError> {
        let url = format!("{}/video-tts/voices", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({}));
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Uploads synthesized audio and returns its public URL.
    pub async fn upload_audio(&self, audio: Vec<u8>, filename: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/upload-audio", self.base_url);

        let part = multipart::Part::bytes(audio)
            .mime_str("audio/mpeg")
            .map_err(ApiError::from)?
            .file_name(filename.to_string());
        let form = multipart::Form::new().part("audio", part);

        let request = self.http.post(url).multipart(form);
        let response = self.authorized(request).send().await?;
        let body: UploadAudioResponse = Self::expect_json(response).await?;
        Ok(body.audio_url)
    }

    /// Mounts an uploaded audio track onto a video and returns the composited URL.
    pub async fn mount_audio(&self, video_url: &str, audio_url: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/video/mount-audio", self.base_url);
        let request = self.http.post(url).json(&serde_json::json!({
            "videoUrl": video_url,
            "audioUrl": audio_url,
        }));
        let response = self.authorized(request).send().await?;
        let body: MountResponse = Self::expect_json(response).await?;
        Ok(body.mounted_url)
    }

    /// Fetches the publishing connection state for both platforms.
    pub async fn auth_status(&self, user_id: &str) -> Result<AuthStatus, ApiError> {
        let url = format!("{}/api/auth/status", self.base_url);
        let request = self.http.get(url).query(&[("userId", user_id)]);
        let response = self.authorized(request).send().await?;
        Self::expect_json(response).await
    }

    /// Requests an OAuth connect URL for a platform.
    pub async fn connect_url(&self, platform: Platform, user_id: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/auth/{}", self.base_url, platform.as_str());
        let request = self.http.post(url).json(&serde_json::json!({
            "userId": user_id,
        }));
        let response = self.authorized(request).send().await?;
        let body: ConnectResponse = Self::expect_json(response).await?;
        Ok(body.auth_url)
    }

    async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            response.json().await.map_err(ApiError::from)
        } else {
            Err(Self::status_error(response).await)
        }
    }

    async fn expect_ok(response: Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::status_error(response).await)
    }

    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ApiError::UnexpectedStatus { status, body }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.auth_token {
            request.header(AUTHORIZATION, format!("Bearer {}", token))
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trims_trailing_slash() {
        let client = ApiClient::new("https://api.storiq.app/", None).expect("client");
        assert_eq!(client.base_url(), "https://api.storiq.app");
    }

    #[test]
    fn error_message_prefers_json_message_field() {
        let err = ApiError::UnexpectedStatus {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"message":"prompt too long"}"#.to_string(),
        };
        assert_eq!(err.message(), "prompt too long");
    }

    #[test]
    fn error_message_falls_back_on_error_field() {
        let err = ApiError::UnexpectedStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: r#"{"error":"boom"}"#.to_string(),
        };
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn error_message_generic_fallback_for_garbage() {
        let err = ApiError::UnexpectedStatus {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>nope</html>".to_string(),
        };
        assert_eq!(err.message(), "Unknown error");
    }
}
