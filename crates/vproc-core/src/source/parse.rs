//! Decode response bodies and pull error details out of failed responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::SourceError;

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, SourceError> {
    serde_json::from_slice(body).map_err(SourceError::Decode)
}

/// Builds the error for a non-2xx response: the first non-empty `keys` entry
/// of a JSON body, else `fallback`.
pub(crate) fn http_error(code: u32, body: &[u8], keys: &[&str], fallback: &str) -> SourceError {
    SourceError::Http {
        code,
        message: error_detail(body, keys).unwrap_or_else(|| fallback.to_string()),
    }
}

/// FastAPI-style bodies: `{"detail": "..."}`, or `{"detail": [{"msg": "..."}, ...]}`
/// for validation errors.
fn error_detail(body: &[u8], keys: &[&str]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    })
}
