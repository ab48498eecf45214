//! Processing status model: the raw status enum reported by the backend,
//! the static progress metadata table, and the coarser UI phases.
//!
//! Everything here is pure: lookups and predicates over a `ProcessingStatus`
//! with no hidden state, safe to call any number of times from any thread.

mod meta;
mod phase;

pub use meta::{status_meta, status_meta_for, StatusMeta, DEFAULT_META};
pub use phase::{
    current_phase_index, is_phase_active, is_phase_complete, Phase, PROCESSING_PHASES,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete stage of a server-side processing job, in expected pipeline order.
///
/// `Completed` and `Failed` are terminal. `Unknown` absorbs any status string a
/// newer backend may introduce so that decoding a status payload never fails
/// on the enum alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Uploading,
    Queued,
    Preparing,
    Transcoding,
    Aggregating,
    Segmenting,
    CreatingManifest,
    UploadingToStorage,
    Finalizing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ProcessingStatus {
    /// Every known status in pipeline order (`Failed` last, `Unknown` excluded).
    pub const ALL: [ProcessingStatus; 11] = [
        ProcessingStatus::Uploading,
        ProcessingStatus::Queued,
        ProcessingStatus::Preparing,
        ProcessingStatus::Transcoding,
        ProcessingStatus::Aggregating,
        ProcessingStatus::Segmenting,
        ProcessingStatus::CreatingManifest,
        ProcessingStatus::UploadingToStorage,
        ProcessingStatus::Finalizing,
        ProcessingStatus::Completed,
        ProcessingStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Uploading => "uploading",
            ProcessingStatus::Queued => "queued",
            ProcessingStatus::Preparing => "preparing",
            ProcessingStatus::Transcoding => "transcoding",
            ProcessingStatus::Aggregating => "aggregating",
            ProcessingStatus::Segmenting => "segmenting",
            ProcessingStatus::CreatingManifest => "creating_manifest",
            ProcessingStatus::UploadingToStorage => "uploading_to_storage",
            ProcessingStatus::Finalizing => "finalizing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Unknown => "unknown",
        }
    }

    /// Parses the exact snake_case wire form, same as the serde decode;
    /// anything else maps to `Unknown`.
    pub fn parse_lossy(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .unwrap_or(ProcessingStatus::Unknown)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_complete(status: ProcessingStatus) -> bool {
    status == ProcessingStatus::Completed
}

pub fn is_failed(status: ProcessingStatus) -> bool {
    status == ProcessingStatus::Failed
}

/// True while the job has not reached a terminal status.
pub fn is_in_progress(status: ProcessingStatus) -> bool {
    !is_complete(status) && !is_failed(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_roundtrip_through_serde() {
        for status in ProcessingStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: ProcessingStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn unknown_wire_value_decodes_to_unknown() {
        let s: ProcessingStatus = serde_json::from_str("\"thumbnailing\"").unwrap();
        assert_eq!(s, ProcessingStatus::Unknown);
    }

    #[test]
    fn parse_lossy_accepts_known_and_tolerates_unknown() {
        assert_eq!(
            ProcessingStatus::parse_lossy("creating_manifest"),
            ProcessingStatus::CreatingManifest
        );
        assert_eq!(
            ProcessingStatus::parse_lossy("some_future_unknown_status"),
            ProcessingStatus::Unknown
        );
    }

    #[test]
    fn parse_lossy_agrees_with_serde_decode() {
        for raw in ["completed", "COMPLETED", "Completed", " transcoding ", "uploading_to_storage"] {
            let decoded: ProcessingStatus = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(ProcessingStatus::parse_lossy(raw), decoded, "{raw:?}");
        }
        assert_eq!(ProcessingStatus::parse_lossy("Completed"), ProcessingStatus::Unknown);
    }

    #[test]
    fn default_is_uploading() {
        assert_eq!(ProcessingStatus::default(), ProcessingStatus::Uploading);
    }

    #[test]
    fn completion_and_failure_predicates() {
        assert!(is_complete(ProcessingStatus::Completed));
        assert!(!is_in_progress(ProcessingStatus::Completed));
        assert!(is_failed(ProcessingStatus::Failed));
        assert!(!is_in_progress(ProcessingStatus::Failed));
        assert!(is_in_progress(ProcessingStatus::Segmenting));
        assert!(is_in_progress(ProcessingStatus::Unknown));
        assert!(ProcessingStatus::Failed.is_terminal());
        assert!(!ProcessingStatus::Finalizing.is_terminal());
    }
}
