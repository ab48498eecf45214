//! Session bookkeeping. `Control` is the authoritative state and is guarded
//! by a mutex; `SessionSnapshot` is the observable copy published to watchers.

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::status::ProcessingStatus;

/// What a UI renders: whether the session is open and the last applied status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    pub is_open: bool,
    pub status: ProcessingStatus,
}

/// Mutable session state. Never held across an await or a callback.
#[derive(Debug, Default)]
pub(super) struct Control {
    /// Most recently provided job id; survives close so a reopen can reuse it.
    pub job_id: Option<String>,
    pub is_open: bool,
    /// Bumped on every open and close. Fetches started under an older
    /// generation are discarded when they resolve.
    pub generation: u64,
    pub poll_task: Option<JoinHandle<()>>,
    /// Sequence number handed to the most recently started fetch.
    pub next_seq: u64,
    /// Sequence number of the newest fetch whose result was applied.
    pub applied_seq: u64,
    /// Set once a terminal status is applied in this generation.
    pub terminal_latched: bool,
    pub consecutive_failures: u32,
    pub opened_at: Option<Instant>,
}

impl Control {
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_open && self.generation == generation
    }

    /// Starts a new polling generation and returns its number.
    pub fn begin_generation(&mut self) -> u64 {
        self.abort_poll_task();
        self.generation += 1;
        self.is_open = true;
        self.next_seq = 0;
        self.applied_seq = 0;
        self.terminal_latched = false;
        self.consecutive_failures = 0;
        self.opened_at = Some(Instant::now());
        self.generation
    }

    /// Closes the session; results still in flight become stale.
    pub fn stop(&mut self) {
        self.abort_poll_task();
        self.is_open = false;
        self.generation += 1;
    }

    pub fn next_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn abort_poll_task(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}
