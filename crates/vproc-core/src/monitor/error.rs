//! Errors reported through the monitor's `on_error` callback.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::source::SourceError;

/// Why a session was abandoned before reaching a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallReason {
    /// This many status fetches in a row failed.
    ConsecutiveFailures(u32),
    /// The session stayed open this long without the job finishing.
    PollTimeout(Duration),
}

impl fmt::Display for StallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StallReason::ConsecutiveFailures(n) => {
                write!(f, "{} consecutive status fetches failed", n)
            }
            StallReason::PollTimeout(d) => {
                write!(f, "still not finished after {}s", d.as_secs())
            }
        }
    }
}

/// Everything the monitor can report. None of these disable the monitor;
/// a later `open_session` starts fresh.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A status fetch failed (network, HTTP, decode). Polling continues.
    #[error("{}", .0.message())]
    Fetch(#[source] SourceError),
    /// The backend reports the job itself failed.
    #[error("{0}")]
    JobFailed(String),
    /// A configured limit was hit; the session has been closed.
    #[error("gave up on job {job_id}: {reason}")]
    Stalled { job_id: String, reason: StallReason },
    /// `open_session` was called outside a tokio runtime.
    #[error("cannot poll job {job_id}: no tokio runtime available")]
    NoRuntime { job_id: String },
}

impl MonitorError {
    /// True for errors about the job rather than about reaching the backend.
    pub fn is_job_failure(&self) -> bool {
        matches!(self, MonitorError::JobFailed(_))
    }
}
