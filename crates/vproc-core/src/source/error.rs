//! Errors raised by the status and upload sources.

use thiserror::Error;

/// Fallback message when the status endpoint gives no usable detail.
pub const STATUS_FETCH_FAILED: &str = "Failed to fetch video status";
/// Fallback message when the upload endpoint gives no usable detail.
pub const UPLOAD_FAILED: &str = "Failed to upload video";
/// Message shown for transport-level failures (no HTTP response at all).
pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";

/// Failure talking to the backend, already normalized into a user-facing message.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No HTTP response: connect refused, DNS, timeout, reset.
    #[error("Network error. Please check your connection. ({0})")]
    Network(#[source] curl::Error),
    /// Non-2xx response. `message` is the backend's detail or a fallback.
    #[error("{message} (HTTP {code})")]
    Http { code: u32, message: String },
    /// 2xx response whose body was not the expected JSON.
    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
    /// `api_url` is not an absolute http(s) URL usable as a base.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),
    /// The job id cannot be turned into a request path.
    #[error("invalid job id {0:?}")]
    InvalidJobId(String),
    /// Multipart form could not be assembled.
    #[error("could not build upload form: {0}")]
    Form(#[from] curl::FormError),
    /// Local file problem (e.g. upload input missing).
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    /// The blocking request task died before producing a result.
    #[error("request task failed: {0}")]
    Task(String),
}

impl SourceError {
    /// Human-readable message without transport detail, suitable for a toast or CLI line.
    pub fn message(&self) -> String {
        match self {
            SourceError::Network(e) if e.is_operation_timedout() => {
                format!("{NETWORK_ERROR} (timeout)")
            }
            SourceError::Network(_) => NETWORK_ERROR.to_string(),
            SourceError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SourceError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<curl::Error> for SourceError {
    fn from(e: curl::Error) -> Self {
        SourceError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_message_is_the_backend_detail() {
        let e = SourceError::Http {
            code: 404,
            message: "Video not found".to_string(),
        };
        assert_eq!(e.message(), "Video not found");
        assert_eq!(e.to_string(), "Video not found (HTTP 404)");
    }

    #[test]
    fn timeout_message_mentions_timeout() {
        // CURLE_OPERATION_TIMEDOUT
        let e = SourceError::Network(curl::Error::new(28));
        assert!(e.message().contains("timeout"));
        assert!(e.to_string().starts_with(NETWORK_ERROR));
    }

    #[test]
    fn connection_refused_is_generic_network_error() {
        // CURLE_COULDNT_CONNECT
        let e = SourceError::Network(curl::Error::new(7));
        assert_eq!(e.message(), NETWORK_ERROR);
    }
}
