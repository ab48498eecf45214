//! `vproc watch <job_id>` – poll a job and print a line per status change.

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use vproc_core::config::VprocConfig;
use vproc_core::monitor::{MonitorCallbacks, MonitorError, MonitorOptions, ProcessingMonitor};
use vproc_core::source::{HttpConfig, HttpStatusSource};
use vproc_core::status::{current_phase_index, status_meta, ProcessingStatus, PROCESSING_PHASES};

enum Outcome {
    Completed,
    Failed(String),
}

/// Monitor options from config, with command-line flags taking precedence.
pub fn watch_options(
    cfg: &VprocConfig,
    interval_ms: Option<u64>,
    max_failures: Option<u32>,
    timeout_secs: Option<u64>,
) -> MonitorOptions {
    let mut options = cfg.monitor_options();
    if let Some(ms) = interval_ms {
        options.polling_interval = Duration::from_millis(ms.max(1));
    }
    if max_failures.is_some() {
        options.max_consecutive_failures = max_failures;
    }
    if let Some(secs) = timeout_secs {
        options.max_poll_duration = Some(Duration::from_secs(secs));
    }
    options.close_on_terminal = true;
    options
}

/// One progress line, e.g. `[ 50%] 3/7 Transcode  Creating quality versions...`.
pub fn progress_line(status: ProcessingStatus) -> String {
    let meta = status_meta(status);
    let phase = match current_phase_index(status) {
        Some(i) => format!("{}/{} {}", i + 1, PROCESSING_PHASES.len(), PROCESSING_PHASES[i].label),
        None => status.as_str().to_string(),
    };
    format!("[{:>3}%] {:<14} {}", meta.progress, phase, meta.message)
}

pub async fn run_watch(http: HttpConfig, options: MonitorOptions, job_id: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let done = tx.clone();
    let callbacks = MonitorCallbacks::new()
        .on_complete(move |_, _| {
            let _ = done.send(Outcome::Completed);
        })
        .on_error(move |_, err| match err {
            MonitorError::Fetch(e) => eprintln!("warning: {}", e.message()),
            other => {
                let _ = tx.send(Outcome::Failed(other.to_string()));
            }
        });

    let monitor = ProcessingMonitor::new(Arc::new(HttpStatusSource::new(http)), options, callbacks);
    let mut updates = monitor.subscribe();
    monitor.open_session(Some(job_id));
    println!("watching job {job_id}");

    let mut shown: Option<ProcessingStatus> = None;
    let outcome = loop {
        tokio::select! {
            outcome = rx.recv() => break outcome,
            changed = updates.changed() => {
                if changed.is_err() {
                    break None;
                }
                let status = updates.borrow_and_update().status;
                if shown != Some(status) {
                    shown = Some(status);
                    println!("{}", progress_line(status));
                }
            }
        }
    };

    let last = monitor.current_status();
    if shown != Some(last) {
        println!("{}", progress_line(last));
    }
    monitor.dispose();

    match outcome {
        Some(Outcome::Completed) => {
            println!("job {job_id}: processing complete");
            Ok(())
        }
        Some(Outcome::Failed(message)) => bail!("job {job_id}: {message}"),
        None => bail!("job {job_id}: monitor stopped unexpectedly"),
    }
}
