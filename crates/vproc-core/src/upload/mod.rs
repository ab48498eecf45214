//! Upload source: creates a video on the backend and returns the job id the
//! processing monitor then follows.

mod http;

pub use http::HttpUploadSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::source::SourceError;

/// Publication state requested for the new video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
}

impl PublicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Published => "published",
            PublicationStatus::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PublicationStatus::Draft),
            "published" => Ok(PublicationStatus::Published),
            "scheduled" => Ok(PublicationStatus::Scheduled),
            other => Err(format!(
                "unknown publication status {other:?} (expected draft, published or scheduled)"
            )),
        }
    }
}

/// Metadata sent as the JSON `data` part of the upload form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub status: PublicationStatus,
    pub tags: Vec<String>,
}

/// One upload: metadata plus the two files.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub metadata: VideoMetadata,
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
}

/// Response of `POST /videos/create`; `id` is the processing job id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[async_trait]
pub trait UploadSource: Send + Sync {
    async fn upload(&self, upload: &VideoUpload) -> Result<UploadResponse, SourceError>;
}
