//! Classify HTTP status codes, curl errors and source errors into retry kinds.

use super::policy::ErrorKind;
use crate::source::SourceError;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

pub fn classify(e: &SourceError) -> ErrorKind {
    match e {
        SourceError::Network(ce) => classify_curl_error(ce),
        SourceError::Http { code, .. } => classify_http_status(*code),
        SourceError::Decode(_)
        | SourceError::InvalidUrl(_)
        | SourceError::InvalidJobId(_)
        | SourceError::Form(_)
        | SourceError::Io { .. }
        | SourceError::Task(_) => ErrorKind::Other,
    }
}
