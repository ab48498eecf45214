//! `vproc upload` – send a video with metadata, optionally watching it afterwards.

use anyhow::{Context, Result};
use std::path::PathBuf;
use vproc_core::monitor::MonitorOptions;
use vproc_core::source::HttpConfig;
use vproc_core::upload::{
    HttpUploadSource, PublicationStatus, UploadSource, VideoMetadata, VideoUpload,
};

use super::run_watch;

#[derive(Debug, Clone)]
pub struct UploadArgs {
    pub video: PathBuf,
    pub thumbnail: PathBuf,
    pub title: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub publish: PublicationStatus,
}

impl UploadArgs {
    pub fn into_upload(self) -> VideoUpload {
        VideoUpload {
            metadata: VideoMetadata {
                title: self.title.trim().to_string(),
                description: self.description,
                category: self.category.trim().to_string(),
                status: self.publish,
                tags: self
                    .tags
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
                ..VideoMetadata::default()
            },
            video_path: self.video,
            thumbnail_path: self.thumbnail,
        }
    }
}

/// Uploads once (no retry: the create call is not idempotent). With `watch`
/// set, follows the new job with those monitor options.
pub async fn run_upload(
    http: HttpConfig,
    args: UploadArgs,
    watch: Option<MonitorOptions>,
) -> Result<()> {
    let upload = args.into_upload();
    let source = HttpUploadSource::new(http.clone());
    let response = source
        .upload(&upload)
        .await
        .with_context(|| format!("uploading {}", upload.video_path.display()))?;

    println!("uploaded \"{}\": job id {}", response.title, response.id);
    if !response.message.is_empty() {
        println!("{}", response.message);
    }

    if let Some(options) = watch {
        run_watch(http, options, &response.id).await?;
    }
    Ok(())
}
