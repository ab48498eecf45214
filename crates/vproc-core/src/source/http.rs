//! Backend HTTP access over libcurl.
//!
//! Requests run on the blocking pool via `spawn_blocking`; each call builds a
//! fresh `Easy` handle with connect/total timeouts and the bearer token.

use async_trait::async_trait;
use curl::easy::{Easy, List};
use std::time::Duration;
use url::Url;

use super::error::{SourceError, STATUS_FETCH_FAILED};
use super::parse::{decode_json, http_error};
use super::{StatusResponse, StatusSource};
use crate::config::VprocConfig;

/// Connection settings shared by the status and upload sources.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub api_url: Url,
    pub access_token: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
}

impl HttpConfig {
    pub fn new(api_url: &str) -> Result<Self, SourceError> {
        let parsed =
            Url::parse(api_url.trim()).map_err(|e| SourceError::InvalidUrl(format!("{api_url}: {e}")))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl(api_url.to_string()));
        }
        Ok(Self {
            api_url: parsed,
            access_token: None,
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(3600),
        })
    }

    pub fn from_config(cfg: &VprocConfig) -> Result<Self, SourceError> {
        let mut http = Self::new(&cfg.api_url)?;
        http.access_token = cfg.access_token.clone();
        http.connect_timeout = cfg.connect_timeout();
        http.request_timeout = cfg.request_timeout();
        http.upload_timeout = cfg.upload_timeout();
        Ok(http)
    }

    /// `api_url` plus path segments; each segment is percent-encoded on its own,
    /// so a job id containing `/` stays one segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Status endpoint for one job: `{api_url}/videos/{job_id}/status`.
    pub fn status_url(&self, job_id: &str) -> Result<Url, SourceError> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(SourceError::InvalidJobId(job_id.to_string()));
        }
        self.endpoint(&["videos", job_id, "status"])
    }

    /// Fresh handle for `url` with timeouts, `Accept: application/json`, the
    /// bearer token and any `extra_headers` ("Name: value").
    pub(crate) fn easy(
        &self,
        url: &Url,
        timeout: Duration,
        extra_headers: &[&str],
    ) -> Result<Easy, SourceError> {
        let mut easy = Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(timeout)?;

        let mut list = List::new();
        list.append("Accept: application/json")?;
        if let Some(token) = self.access_token.as_deref() {
            list.append(&format!("Authorization: Bearer {}", token.trim()))?;
        }
        for header in extra_headers {
            list.append(header)?;
        }
        easy.http_headers(list)?;
        Ok(easy)
    }
}

/// Performs the transfer and returns `(status code, body)`.
pub(crate) fn perform(easy: &mut Easy) -> Result<(u32, Vec<u8>), SourceError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()?;
    Ok((code, body))
}

/// Runs a blocking curl request on the blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, SourceError>
where
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SourceError::Task(e.to_string()))?
}

/// Status source backed by the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    http: HttpConfig,
}

impl HttpStatusSource {
    pub fn new(http: HttpConfig) -> Self {
        Self { http }
    }

    /// Blocking fetch; call from `spawn_blocking` if used from async code.
    pub fn fetch_blocking(&self, job_id: &str) -> Result<StatusResponse, SourceError> {
        let url = self.http.status_url(job_id)?;
        let mut easy = self.http.easy(&url, self.http.request_timeout, &[])?;
        let (code, body) = perform(&mut easy)?;
        tracing::trace!(job_id, code, bytes = body.len(), "status response");
        if !(200..300).contains(&code) {
            return Err(http_error(code, &body, &["detail"], STATUS_FETCH_FAILED));
        }
        decode_json(&body)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self, job_id: &str) -> Result<StatusResponse, SourceError> {
        let source = self.clone();
        let job_id = job_id.to_string();
        run_blocking(move || source.fetch_blocking(&job_id)).await
    }
}
