//! Crop/export: submit a crop job and track it in the local history.

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::api::ApiClient;
use crate::crop::CropSelection;
use crate::exports::ExportStore;
use crate::models::ExportEntry;
use crate::phase::Tracker;
use crate::workflows::WorkflowError;

/// Generate a new client-side export identifier.
pub fn generate_export_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    format!(
        "exp_{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    )
}

/// Derives a local filename from the video URL's last path segment.
pub fn suggested_filename(video_url: &str) -> String {
    url::Url::parse(video_url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_owned))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| "export.mp4".to_string())
}

#[derive(Debug)]
pub struct ExportFlow {
    pub request: Tracker<crate::api::CropJob>,
}

impl ExportFlow {
    pub fn new() -> Self {
        Self {
            request: Tracker::new("crop-video"),
        }
    }

    /// Submits the selected window to the crop endpoint and, on success,
    /// records an entry in the local export history.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        store: &ExportStore,
        user_id: &str,
        video_url: &str,
        selection: &CropSelection,
    ) -> Result<ExportEntry, WorkflowError> {
        if selection.is_empty() {
            return Err(self
                .request
                .reject("Crop selection must span more than zero seconds")
                .into());
        }

        let window = selection.window();
        let job = self
            .request
            .run(api.crop_video(video_url, window.start, window.end, user_id))
            .await?;

        let entry = ExportEntry {
            filename: suggested_filename(video_url),
            date: Utc::now(),
            crop: window,
            url: video_url.to_string(),
            job_id: job.job_id,
            status: job.status,
            export_id: generate_export_id(),
            user_id: user_id.to_string(),
        };
        store.append(entry.clone())?;
        info!("export {} queued as job {}", entry.export_id, entry.job_id);
        Ok(entry)
    }
}

impl Default for ExportFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Polls the job status of every non-terminal entry and rewrites the store.
/// Returns how many entries changed.
pub async fn reconcile(api: &ApiClient, store: &ExportStore) -> Result<usize, WorkflowError> {
    let mut list = store.load()?;
    let mut updated = 0;

    for entry in &mut list.entries {
        if entry.status.is_terminal() {
            continue;
        }
        let job = api.crop_status(&entry.job_id).await?;
        if job.status != entry.status {
            info!(
                "export {}: {} -> {}",
                entry.export_id, entry.status, job.status
            );
            entry.status = job.status;
            updated += 1;
        }
    }

    if updated > 0 {
        store.save(&mut list)?;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_ids_are_prefixed_and_unique() {
        let a = generate_export_id();
        let b = generate_export_id();
        assert!(a.starts_with("exp_"));
        assert!(a.len() > 10);
        assert_ne!(a, b);
    }

    #[test]
    fn filename_comes_from_last_path_segment() {
        assert_eq!(
            suggested_filename("https://cdn.storiq.app/u1/videos/take-3.mp4"),
            "take-3.mp4"
        );
        assert_eq!(suggested_filename("https://cdn.storiq.app/"), "export.mp4");
        assert_eq!(suggested_filename("not a url"), "export.mp4");
    }
}
