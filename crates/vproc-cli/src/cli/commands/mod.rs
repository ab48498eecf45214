//! CLI command handlers, one file per command.

mod phases;
mod status;
mod upload;
mod watch;

pub use phases::run_phases;
pub use status::run_status;
pub use upload::{run_upload, UploadArgs};
pub use watch::{run_watch, watch_options};
