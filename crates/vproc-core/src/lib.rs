//! Client-side tracking of server-side video processing jobs.
//!
//! `status` holds the pure status model (metadata and UI phases), `source`
//! fetches job status from the backend, `monitor` polls it while a session is
//! open, and `upload` submits new videos that produce the job ids to watch.

pub mod config;
pub mod logging;
pub mod monitor;
pub mod retry;
pub mod source;
pub mod status;
pub mod upload;
