//! `vproc phases` – print the phase table with per-status progress.

use vproc_core::status::{status_meta, PROCESSING_PHASES};

pub fn run_phases() {
    println!("{:<3} {:<10} {:<22} {:>4}  {}", "#", "PHASE", "STATUS", "PCT", "MESSAGE");
    for (index, phase) in PROCESSING_PHASES.iter().enumerate() {
        for status in phase.statuses {
            let meta = status_meta(*status);
            println!(
                "{:<3} {:<10} {:<22} {:>3}%  {}",
                index + 1,
                phase.label,
                status.as_str(),
                meta.progress,
                meta.message
            );
        }
    }
}
