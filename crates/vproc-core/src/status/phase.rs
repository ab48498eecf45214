//! UI phases: ordered groups of raw statuses for a simplified progress stepper.

use serde::Serialize;

use super::ProcessingStatus;

/// One step of the progress stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub id: &'static str,
    pub label: &'static str,
    pub statuses: &'static [ProcessingStatus],
}

/// Phases in display order. Every status except `Failed` and `Unknown` appears
/// in exactly one phase.
pub const PROCESSING_PHASES: [Phase; 7] = [
    Phase {
        id: "upload",
        label: "Upload",
        statuses: &[ProcessingStatus::Uploading, ProcessingStatus::Queued],
    },
    Phase {
        id: "analyze",
        label: "Analyze",
        statuses: &[ProcessingStatus::Preparing],
    },
    Phase {
        id: "transcode",
        label: "Transcode",
        statuses: &[ProcessingStatus::Transcoding],
    },
    Phase {
        id: "segment",
        label: "Segment",
        statuses: &[ProcessingStatus::Aggregating, ProcessingStatus::Segmenting],
    },
    Phase {
        id: "package",
        label: "Package",
        statuses: &[ProcessingStatus::CreatingManifest],
    },
    Phase {
        id: "deploy",
        label: "Deploy",
        statuses: &[
            ProcessingStatus::UploadingToStorage,
            ProcessingStatus::Finalizing,
        ],
    },
    Phase {
        id: "complete",
        label: "Complete",
        statuses: &[ProcessingStatus::Completed],
    },
];

/// Index of the phase containing `status`, or `None` when no phase does
/// (`Failed` has no position in the stepper).
pub fn current_phase_index(status: ProcessingStatus) -> Option<usize> {
    PROCESSING_PHASES
        .iter()
        .position(|phase| phase.statuses.contains(&status))
}

/// A phase is complete once the job has moved past it. `Completed` marks every
/// phase complete, including the last one.
pub fn is_phase_complete(phase_index: usize, status: ProcessingStatus) -> bool {
    status == ProcessingStatus::Completed
        || current_phase_index(status).is_some_and(|current| current > phase_index)
}

/// The phase holding the current status, unless the job is terminal.
pub fn is_phase_active(phase_index: usize, status: ProcessingStatus) -> bool {
    current_phase_index(status) == Some(phase_index)
        && status != ProcessingStatus::Completed
        && status != ProcessingStatus::Failed
}
