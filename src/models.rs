//! Shared data models used across modules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A video record as the backend returns it. Every field except the playback
/// URL is optional; older records are missing most of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Duration in seconds, when the backend has probed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Storage handle used for delete-by-key.
    #[serde(rename = "s3Key", default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
}

/// One prompt/script pair from the user's generation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptHistoryItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub prompt: String,
    pub script: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A `[start, end]` sub-interval of a video timeline, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    pub start: f64,
    pub end: f64,
}

/// Backend-reported status of an export job. The backend owns the vocabulary,
/// so unknown values pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(pub String);

impl JobStatus {
    pub const QUEUED: &'static str = "queued";
    pub const PROCESSING: &'static str = "processing";
    pub const DONE: &'static str = "done";
    pub const FAILED: &'static str = "failed";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Terminal statuses are never polled again.
    pub fn is_terminal(&self) -> bool {
        matches!(self.0.as_str(), Self::DONE | Self::FAILED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A locally persisted record of a crop/export request. The client owns this
/// list; the backend only knows the job id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEntry {
    pub filename: String,
    pub date: DateTime<Utc>,
    pub crop: CropWindow,
    pub url: String,
    pub job_id: String,
    pub status: JobStatus,
    pub export_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Generation settings sent alongside a video prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Target duration in seconds.
    pub duration: u32,
    pub preset: String,
    pub voice: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            duration: 30,
            preset: "Default".to_string(),
            voice: "Voice Library".to_string(),
        }
    }
}

impl GenerateConfig {
    pub fn with_duration(duration: u32) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }
}

/// Aggregate counters from the stats summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_exports: i64,
}

/// One point of the per-day analytics series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub views: i64,
    pub videos: i64,
}

/// Publishing targets the product integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Instagram,
}

impl Platform {
    /// Path segment used by the auth endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Instagram => "instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-video publishing choice, held in memory only for a publish session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformSelection {
    pub yt: bool,
    pub ig: bool,
}

impl PlatformSelection {
    pub fn any(&self) -> bool {
        self.yt || self.ig
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut out = Vec::new();
        if self.yt {
            out.push(Platform::YouTube);
        }
        if self.ig {
            out.push(Platform::Instagram);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_tolerates_minimal_record() {
        let video: Video = serde_json::from_str(r#"{"url":"https://x/v.mp4"}"#).expect("parse");
        assert_eq!(video.url, "https://x/v.mp4");
        assert!(video.s3_key.is_none());
        assert!(video.duration.is_none());
    }

    #[test]
    fn export_entry_serializes_wire_names() {
        let entry = ExportEntry {
            filename: "clip.mp4".into(),
            date: Utc::now(),
            crop: CropWindow {
                start: 1.0,
                end: 4.5,
            },
            url: "https://x/v.mp4".into(),
            job_id: "j1".into(),
            status: JobStatus::new(JobStatus::QUEUED),
            export_id: "exp_abc".into(),
            user_id: "u1".into(),
        };
        let json = serde_json::to_string(&entry).expect("serialize entry");
        assert!(json.contains("\"userId\":\"u1\""));
        assert!(json.contains("\"job_id\":\"j1\""));
        assert!(json.contains("\"status\":\"queued\""));
        assert!(json.contains("\"start\":1.0"));
    }

    #[test]
    fn generate_config_defaults() {
        let config = GenerateConfig::default();
        assert_eq!(config.duration, 30);
        assert_eq!(config.preset, "Default");
        assert_eq!(config.voice, "Voice Library");
    }

    #[test]
    fn job_status_terminal_states() {
        assert!(JobStatus::new("done").is_terminal());
        assert!(JobStatus::new("failed").is_terminal());
        assert!(!JobStatus::new("queued").is_terminal());
        assert!(!JobStatus::new("transcoding").is_terminal());
    }

    #[test]
    fn script_history_item_uses_mongo_style_id() {
        let item: ScriptHistoryItem = serde_json::from_str(
            r#"{"_id":"abc","prompt":"p","script":"s","createdAt":"2026-01-02T03:04:05Z"}"#,
        )
        .expect("parse");
        assert_eq!(item.id.as_deref(), Some("abc"));
    }
}
