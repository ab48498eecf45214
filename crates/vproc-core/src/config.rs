use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::monitor::MonitorOptions;
use crate::retry::RetryPolicy;

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "VPROC_API_URL";
/// Environment variable overriding `access_token`.
pub const ACCESS_TOKEN_ENV: &str = "VPROC_ACCESS_TOKEN";

/// Retry policy parameters for one-shot requests (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/vproc/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VprocConfig {
    /// Base URL of the backend REST API.
    pub api_url: String,
    /// Delay between status polls while a session is open.
    pub polling_interval_ms: u64,
    /// TCP connect timeout for API requests.
    pub connect_timeout_secs: u64,
    /// Total timeout for one API request.
    pub request_timeout_secs: u64,
    /// Total timeout for a video upload, which carries the whole file.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
    /// Optional bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Give up on a session after this many consecutive failed polls (None = never).
    #[serde(default)]
    pub max_consecutive_failures: Option<u32>,
    /// Give up on a session that has not finished after this long (None = never).
    #[serde(default)]
    pub max_poll_duration_secs: Option<u64>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_upload_timeout_secs() -> u64 {
    3600
}

impl Default for VprocConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            polling_interval_ms: 2000,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            upload_timeout_secs: default_upload_timeout_secs(),
            access_token: None,
            max_consecutive_failures: None,
            max_poll_duration_secs: None,
            retry: None,
        }
    }
}

impl VprocConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// Monitor options derived from this config (callers may still override).
    pub fn monitor_options(&self) -> MonitorOptions {
        MonitorOptions {
            polling_interval: self.polling_interval(),
            max_consecutive_failures: self.max_consecutive_failures,
            max_poll_duration: self.max_poll_duration_secs.map(Duration::from_secs),
            close_on_terminal: false,
        }
    }

    /// Applies `VPROC_API_URL` / `VPROC_ACCESS_TOKEN` when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url.filter(|s| !s.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(token) = token.filter(|s| !s.trim().is_empty()) {
            self.access_token = Some(token.trim().to_string());
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vproc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied on top of whatever was loaded.
pub fn load_or_init() -> Result<VprocConfig> {
    let path = config_path()?;
    let mut cfg = if !path.exists() {
        let default_cfg = VprocConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    } else {
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data)?
    };
    cfg.apply_env_overrides();
    Ok(cfg)
}
