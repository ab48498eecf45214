//! The polling loop and how fetch results are applied.
//!
//! Each open generation owns one loop task driven by `tokio::time::interval`.
//! Every tick spawns its own fetch, so a slow request never delays the next
//! tick; stale or superseded results are dropped by the generation and
//! sequence checks in `apply_result`.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

use super::error::{MonitorError, StallReason};
use super::{Inner, ProcessingMonitor};
use crate::source::{SourceError, StatusResponse};

/// Runs until the session closes, a new generation starts, or the monitor is dropped.
/// Holds only a weak reference so it never keeps the monitor alive.
pub(super) async fn run(inner: Weak<Inner>, job_id: String, generation: u64, every: Duration) {
    let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(strong) = inner.upgrade() else { break };
        let Some(seq) = begin_fetch(&strong, &job_id, generation) else { break };
        let source = Arc::clone(&strong.source);
        let weak = Arc::downgrade(&strong);
        drop(strong);

        let job_id = job_id.clone();
        tokio::spawn(async move {
            let result = source.fetch_status(&job_id).await;
            if let Some(inner) = weak.upgrade() {
                apply_result(&inner, &job_id, generation, seq, result);
            }
        });
    }
    tracing::debug!(job_id = %job_id, generation, "poll loop finished");
}

/// Claims a sequence number for the next fetch, or `None` if polling should stop.
fn begin_fetch(inner: &Arc<Inner>, job_id: &str, generation: u64) -> Option<u64> {
    let mut control = inner.lock_control();
    if !control.is_current(generation) {
        return None;
    }
    let timed_out = match (inner.options.max_poll_duration, control.opened_at) {
        (Some(limit), Some(opened)) if !control.terminal_latched => {
            Instant::now().duration_since(opened) >= limit
        }
        _ => false,
    };
    if timed_out {
        control.stop();
        inner.publish_open(false);
        drop(control);
        let limit = inner.options.max_poll_duration.unwrap_or_default();
        tracing::warn!(job_id, limit_secs = limit.as_secs(), "polling timed out");
        inner.report_error(MonitorError::Stalled {
            job_id: job_id.to_string(),
            reason: StallReason::PollTimeout(limit),
        });
        return None;
    }
    Some(control.next_fetch())
}

/// Applies one fetch result if it still belongs to the open generation and is
/// newer than anything applied so far, then fires callbacks outside the lock.
fn apply_result(
    inner: &Arc<Inner>,
    job_id: &str,
    generation: u64,
    seq: u64,
    result: Result<StatusResponse, SourceError>,
) {
    match result {
        Ok(response) => {
            {
                let mut control = inner.lock_control();
                if !control.is_current(generation) {
                    tracing::debug!(job_id, seq, "discarding status for closed or superseded session");
                    return;
                }
                if seq <= control.applied_seq {
                    tracing::debug!(job_id, seq, applied = control.applied_seq, "discarding out-of-order status");
                    return;
                }
                control.applied_seq = seq;
                control.consecutive_failures = 0;

                let current = inner.display.borrow().status;
                if control.terminal_latched && response.status != current {
                    tracing::debug!(
                        job_id,
                        status = %response.status,
                        terminal = %current,
                        "ignoring status after terminal state"
                    );
                    return;
                }
                if response.status.is_terminal() {
                    control.terminal_latched = true;
                }
                inner.publish_status(response.status);

                if inner.options.close_on_terminal && (response.is_completed || response.is_failed) {
                    control.stop();
                    inner.publish_open(false);
                }
            }

            tracing::debug!(job_id, seq, status = %response.status, "status applied");
            if response.is_completed {
                tracing::info!(job_id, "processing completed");
                inner.report_complete(job_id);
            }
            if response.is_failed {
                let message = response.failure_message();
                tracing::warn!(job_id, error = %message, "processing failed");
                inner.report_error(MonitorError::JobFailed(message));
            }
        }
        Err(err) => {
            let stalled = {
                let mut control = inner.lock_control();
                if !control.is_current(generation) {
                    tracing::debug!(job_id, seq, "discarding fetch error for closed or superseded session");
                    return;
                }
                if seq <= control.applied_seq {
                    tracing::debug!(job_id, seq, applied = control.applied_seq, "discarding out-of-order fetch error");
                    return;
                }
                // A finished job cannot stall.
                if !control.terminal_latched {
                    control.consecutive_failures += 1;
                }
                let failures = control.consecutive_failures;
                let limit_hit = !control.terminal_latched
                    && inner
                        .options
                        .max_consecutive_failures
                        .is_some_and(|max| failures >= max);
                if limit_hit {
                    control.stop();
                    inner.publish_open(false);
                }
                limit_hit.then_some(failures)
            };

            tracing::warn!(job_id, seq, error = %err, "status fetch failed");
            inner.report_error(MonitorError::Fetch(err));
            if let Some(failures) = stalled {
                tracing::warn!(job_id, failures, "giving up after repeated fetch failures");
                inner.report_error(MonitorError::Stalled {
                    job_id: job_id.to_string(),
                    reason: StallReason::ConsecutiveFailures(failures),
                });
            }
        }
    }
}

impl Inner {
    fn report_complete(self: &Arc<Self>, job_id: &str) {
        if let Some(cb) = &self.callbacks.on_complete {
            cb(&ProcessingMonitor::from_inner(Arc::clone(self)), job_id);
        }
    }

    pub(super) fn report_error(self: &Arc<Self>, err: MonitorError) {
        if let Some(cb) = &self.callbacks.on_error {
            cb(&ProcessingMonitor::from_inner(Arc::clone(self)), &err);
        }
    }
}
