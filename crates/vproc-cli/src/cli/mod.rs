//! CLI for uploading videos and following their server-side processing.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vproc_core::config::{self, VprocConfig};
use vproc_core::source::HttpConfig;
use vproc_core::upload::PublicationStatus;

use commands::{run_phases, run_status, run_upload, run_watch, watch_options, UploadArgs};

/// Top-level CLI for vproc.
#[derive(Debug, Parser)]
#[command(name = "vproc")]
#[command(about = "vproc: upload videos and follow their processing status", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and VPROC_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Follow a processing job until it completes or fails.
    Watch {
        /// Job identifier returned by the upload.
        job_id: String,
        /// Delay between status polls in milliseconds (default from config).
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Give up after N consecutive failed polls.
        #[arg(long, value_name = "N")]
        max_failures: Option<u32>,
        /// Give up if the job has not finished after this many seconds.
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },

    /// Fetch the current status of a job once.
    Status {
        /// Job identifier.
        job_id: String,
    },

    /// Upload a video with its thumbnail and metadata.
    Upload {
        /// Path to the video file.
        #[arg(long, value_name = "PATH")]
        video: PathBuf,
        /// Path to the thumbnail image.
        #[arg(long, value_name = "PATH")]
        thumbnail: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Tag to attach; repeat for several.
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Publication state: draft, published or scheduled.
        #[arg(long, default_value = "draft", value_name = "STATE")]
        publish: PublicationStatus,
        /// Follow processing of the uploaded video until it finishes.
        #[arg(long)]
        watch: bool,
    },

    /// List the processing phases and the statuses in each.
    Phases,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        if let CliCommand::Phases = cli.command {
            run_phases();
            return Ok(());
        }

        let mut cfg = config::load_or_init()?;
        if let Some(url) = cli.api_url {
            cfg.api_url = url;
        }
        tracing::debug!("loaded config: {:?}", cfg);
        let http = http_config(&cfg)?;

        match cli.command {
            CliCommand::Watch {
                job_id,
                interval_ms,
                max_failures,
                timeout_secs,
            } => {
                let options = watch_options(&cfg, interval_ms, max_failures, timeout_secs);
                run_watch(http, options, &job_id).await?;
            }
            CliCommand::Status { job_id } => run_status(http, &cfg.retry_policy(), &job_id).await?,
            CliCommand::Upload {
                video,
                thumbnail,
                title,
                category,
                description,
                tags,
                publish,
                watch,
            } => {
                let args = UploadArgs {
                    video,
                    thumbnail,
                    title,
                    category,
                    description,
                    tags,
                    publish,
                };
                let options = watch.then(|| watch_options(&cfg, None, None, None));
                run_upload(http, args, options).await?;
            }
            CliCommand::Phases => run_phases(),
        }

        Ok(())
    }
}

fn http_config(cfg: &VprocConfig) -> Result<HttpConfig> {
    HttpConfig::from_config(cfg).with_context(|| format!("invalid api_url {:?}", cfg.api_url))
}

#[cfg(test)]
mod tests;
