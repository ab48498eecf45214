//! `vproc status <job_id>` – fetch and print a job's status once.

use anyhow::{Context, Result};
use vproc_core::retry::{run_with_retry, RetryPolicy};
use vproc_core::source::{HttpConfig, HttpStatusSource, StatusSource};
use vproc_core::status::{current_phase_index, status_meta, PROCESSING_PHASES};

pub async fn run_status(http: HttpConfig, policy: &RetryPolicy, job_id: &str) -> Result<()> {
    let source = HttpStatusSource::new(http);
    let response = run_with_retry(policy, || source.fetch_status(job_id))
        .await
        .with_context(|| format!("fetching status of job {job_id}"))?;

    let meta = status_meta(response.status);
    let message = if response.message.trim().is_empty() {
        meta.message
    } else {
        response.message.trim()
    };
    let phase = current_phase_index(response.status)
        .map(|i| format!("{}/{} {}", i + 1, PROCESSING_PHASES.len(), PROCESSING_PHASES[i].label))
        .unwrap_or_else(|| "-".to_string());

    println!("{:<10} {}", "job:", job_id);
    println!("{:<10} {}", "status:", response.status);
    println!("{:<10} {}%", "progress:", meta.progress);
    println!("{:<10} {}", "message:", message);
    println!("{:<10} {}", "phase:", phase);
    if response.is_failed {
        println!("{:<10} {}", "error:", response.failure_message());
    }
    Ok(())
}
