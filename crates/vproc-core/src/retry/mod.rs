//! Retry and backoff policy for one-shot backend requests.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures) and exponential backoff decisions so that the CLI's
//! single-request commands share one policy. The processing monitor does not
//! use it: polling keeps its fixed interval and treats each failure as a
//! reportable event rather than something to back off from.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
