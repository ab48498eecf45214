//! Status source: where the monitor gets a job's current processing status.
//!
//! The monitor only depends on the `StatusSource` trait. `HttpStatusSource`
//! talks to the backend's `GET /videos/{id}/status` endpoint with libcurl;
//! tests substitute scripted fakes.

mod error;
mod http;
mod parse;

pub use error::{SourceError, NETWORK_ERROR, STATUS_FETCH_FAILED, UPLOAD_FAILED};
pub use http::{HttpConfig, HttpStatusSource};
pub(crate) use http::{perform, run_blocking};
pub(crate) use parse::{decode_json, http_error};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::status::ProcessingStatus;

/// Fallback when a failed job's payload carries no error text.
pub const JOB_FAILED_FALLBACK: &str = "Video processing failed";

/// Payload of the status endpoint.
///
/// Completion and failure are signalled by the explicit flags, not by the
/// enum alone, so a backend whose flags and status disagree is handled the
/// way it reports itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub video_id: String,
    pub status: ProcessingStatus,
    /// Server-side progress estimate; the client renders `status_meta` instead.
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_failed: bool,
}

impl StatusResponse {
    /// Payload with only `status` set and flags derived from it.
    pub fn from_status(video_id: impl Into<String>, status: ProcessingStatus) -> Self {
        Self {
            video_id: video_id.into(),
            status,
            progress: None,
            message: String::new(),
            error: None,
            is_completed: status == ProcessingStatus::Completed,
            is_failed: status == ProcessingStatus::Failed,
        }
    }

    /// The error text to surface for a failed job.
    pub fn failure_message(&self) -> String {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(JOB_FAILED_FALLBACK)
            .to_string()
    }
}

/// Fetches the current status of one job.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, SourceError>;
}
