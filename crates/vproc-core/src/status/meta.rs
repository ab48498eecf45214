//! Per-status progress metadata used for progress bars and status text.

use serde::Serialize;

use super::ProcessingStatus;

/// Progress percentage and human-readable message for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMeta {
    /// Progress in percent, 0..=100.
    pub progress: u8,
    pub message: &'static str,
}

/// Returned for statuses missing from the table (e.g. `Unknown`).
pub const DEFAULT_META: StatusMeta = StatusMeta {
    progress: 0,
    message: "Processing...",
};

const STATUS_META: [(ProcessingStatus, StatusMeta); 11] = [
    (ProcessingStatus::Uploading, meta(5, "Uploading video...")),
    (ProcessingStatus::Queued, meta(15, "Video queued for processing")),
    (ProcessingStatus::Preparing, meta(25, "Analyzing video...")),
    (ProcessingStatus::Transcoding, meta(50, "Creating quality versions...")),
    (ProcessingStatus::Aggregating, meta(60, "Compiling video outputs...")),
    (ProcessingStatus::Segmenting, meta(70, "Preparing for streaming...")),
    (ProcessingStatus::CreatingManifest, meta(80, "Generating playlists...")),
    (ProcessingStatus::UploadingToStorage, meta(90, "Saving to storage...")),
    (ProcessingStatus::Finalizing, meta(95, "Almost done...")),
    (ProcessingStatus::Completed, meta(100, "Processing complete!")),
    (ProcessingStatus::Failed, meta(0, "Processing failed")),
];

const fn meta(progress: u8, message: &'static str) -> StatusMeta {
    StatusMeta { progress, message }
}

/// Table lookup; falls back to `DEFAULT_META` for statuses not in the table.
pub fn status_meta(status: ProcessingStatus) -> StatusMeta {
    STATUS_META
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, m)| *m)
        .unwrap_or(DEFAULT_META)
}

/// Like `status_meta` but for a raw wire string, e.g. straight from a payload.
pub fn status_meta_for(raw: &str) -> StatusMeta {
    status_meta(ProcessingStatus::parse_lossy(raw))
}
