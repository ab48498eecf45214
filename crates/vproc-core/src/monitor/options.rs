//! Monitor tuning and caller-supplied callbacks.

use std::fmt;
use std::time::Duration;

use super::{MonitorError, ProcessingMonitor};

/// Default delay between status polls.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Delay between fetches; the first fetch happens immediately on open.
    pub polling_interval: Duration,
    /// Close the session and report `Stalled` after this many failed fetches in a row.
    pub max_consecutive_failures: Option<u32>,
    /// Close the session and report `Stalled` when it has been open this long
    /// without reaching a terminal status.
    pub max_poll_duration: Option<Duration>,
    /// Close the session right after a completion or failure payload.
    /// When false, `on_complete` fires again on every tick while the job stays completed.
    pub close_on_terminal: bool,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            polling_interval: DEFAULT_POLLING_INTERVAL,
            max_consecutive_failures: None,
            max_poll_duration: None,
            close_on_terminal: false,
        }
    }
}

impl MonitorOptions {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            polling_interval: interval,
            ..Self::default()
        }
    }
}

pub type CompleteCallback = Box<dyn Fn(&ProcessingMonitor, &str) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&ProcessingMonitor, &MonitorError) + Send + Sync>;

/// Completion/failure hooks. Both receive the monitor itself, so a hook can
/// call `close_session()` without holding its own clone.
#[derive(Default)]
pub struct MonitorCallbacks {
    pub(super) on_complete: Option<CompleteCallback>,
    pub(super) on_error: Option<ErrorCallback>,
}

impl MonitorCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the job id whenever a payload carries `is_completed`.
    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProcessingMonitor, &str) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Called for fetch failures, job failures and stalls.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProcessingMonitor, &MonitorError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for MonitorCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorCallbacks")
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
