//! Processing monitor: polls a job's status while a session is open and
//! reports completion or failure through callbacks.
//!
//! A session is opened for a job id, fetches immediately, then again on every
//! polling interval until it is closed, reset, or the monitor is dropped.
//! Results that arrive after a close, after a newer job was opened, or out of
//! order are discarded, so the published status only ever reflects the newest
//! response for the current session. Observers either read the accessors or
//! `subscribe()` to a `watch` channel of [`SessionSnapshot`]s.
//!
//! `open_session` must be called from within a tokio runtime.

mod error;
mod options;
mod poll;
mod session;

pub use error::{MonitorError, StallReason};
pub use options::{
    CompleteCallback, ErrorCallback, MonitorCallbacks, MonitorOptions, DEFAULT_POLLING_INTERVAL,
};
pub use session::SessionSnapshot;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::source::StatusSource;
use crate::status::{self, ProcessingStatus, StatusMeta};
use session::Control;

/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct ProcessingMonitor {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn StatusSource>,
    options: MonitorOptions,
    callbacks: MonitorCallbacks,
    control: Mutex<Control>,
    display: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_open(&self, is_open: bool) {
        self.display.send_if_modified(|snap| {
            let changed = snap.is_open != is_open;
            snap.is_open = is_open;
            changed
        });
    }

    fn publish_status(&self, status: ProcessingStatus) {
        self.display.send_if_modified(|snap| {
            let changed = snap.status != status;
            snap.status = status;
            changed
        });
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let control = self.control.get_mut().unwrap_or_else(PoisonError::into_inner);
        control.abort_poll_task();
    }
}

impl ProcessingMonitor {
    pub fn new(
        source: Arc<dyn StatusSource>,
        options: MonitorOptions,
        callbacks: MonitorCallbacks,
    ) -> Self {
        let (display, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                source,
                options,
                callbacks,
                control: Mutex::new(Control::default()),
                display,
            }),
        }
    }

    fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Opens (or re-targets) the session and starts polling.
    ///
    /// A non-blank `job_id` replaces the stored id; `None` or a blank id reuses
    /// the previous one. Opening an already open session for the same job is a
    /// no-op. With no id at all the session is marked open but nothing is
    /// polled until an id is supplied.
    pub fn open_session(&self, job_id: Option<&str>) {
        let requested = job_id.map(str::trim).filter(|id| !id.is_empty());
        let mut control = self.inner.lock_control();
        let retarget = requested.is_some_and(|id| control.job_id.as_deref() != Some(id));
        if let Some(id) = requested {
            control.job_id = Some(id.to_string());
        }
        if control.is_open && !retarget {
            tracing::debug!(job_id = ?control.job_id, "session already open");
            return;
        }

        let generation = control.begin_generation();
        self.inner.publish_open(true);
        let Some(job_id) = control.job_id.clone() else {
            tracing::debug!("session opened without a job id; waiting for one");
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                tracing::info!(job_id = %job_id, generation, "processing session opened");
                let task = poll::run(
                    Arc::downgrade(&self.inner),
                    job_id,
                    generation,
                    self.inner.options.polling_interval,
                );
                control.poll_task = Some(handle.spawn(task));
            }
            Err(_) => {
                control.stop();
                self.inner.publish_open(false);
                drop(control);
                tracing::error!(job_id = %job_id, "cannot poll: no tokio runtime");
                self.inner.report_error(MonitorError::NoRuntime { job_id });
            }
        }
    }

    /// Stops polling. Status and job id are kept; in-flight results are discarded.
    pub fn close_session(&self) {
        let mut control = self.inner.lock_control();
        if !control.is_open {
            return;
        }
        control.stop();
        self.inner.publish_open(false);
        tracing::info!(job_id = ?control.job_id, "processing session closed");
    }

    /// Closes the session and puts the status back to `Uploading`.
    /// The job id is kept so a later `open_session(None)` can resume it.
    pub fn reset_session(&self) {
        let mut control = self.inner.lock_control();
        if control.is_open {
            control.stop();
        }
        self.inner.display.send_if_modified(|snap| {
            let changed = *snap != SessionSnapshot::default();
            *snap = SessionSnapshot::default();
            changed
        });
        tracing::debug!(job_id = ?control.job_id, "processing session reset");
    }

    /// Closes the session and releases this handle.
    pub fn dispose(self) {
        self.close_session();
    }

    pub fn is_open(&self) -> bool {
        self.inner.display.borrow().is_open
    }

    pub fn current_status(&self) -> ProcessingStatus {
        self.inner.display.borrow().status
    }

    pub fn job_id(&self) -> Option<String> {
        self.inner.lock_control().job_id.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        *self.inner.display.borrow()
    }

    /// Receiver that wakes on every change to `is_open` or the status.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.display.subscribe()
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.inner.options
    }

    pub fn status_meta(&self) -> StatusMeta {
        status::status_meta(self.current_status())
    }

    pub fn current_phase_index(&self) -> Option<usize> {
        status::current_phase_index(self.current_status())
    }

    pub fn is_phase_complete(&self, phase_index: usize) -> bool {
        status::is_phase_complete(phase_index, self.current_status())
    }

    pub fn is_phase_active(&self, phase_index: usize) -> bool {
        status::is_phase_active(phase_index, self.current_status())
    }
}

impl std::fmt::Debug for ProcessingMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingMonitor")
            .field("snapshot", &self.snapshot())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}
