//! Error message policy
//!
//! Failures are shown to the user as a single line. Structured fields in the
//! service's error body win over transport-level text, in the order
//! `detail`, `error`, `message`; "Network error" is the last resort.

use std::error::Error as StdError;
use std::time::Duration;

use serde_json::Value;

/// Last-resort message when nothing better is known
pub const FALLBACK_MESSAGE: &str = "Network error";

/// Prefix marking error notifications
pub const ERROR_MARKER: &str = "Error: ";

/// Structured fields checked in priority order
const MESSAGE_FIELDS: [&str; 3] = ["detail", "error", "message"];

/// Pick the human-readable cause of a failed request
///
/// `body` is the parsed error body (if it was JSON); `transport` is the
/// generic message describing the failure itself.
pub fn extract_error_message(body: Option<&Value>, transport: Option<&str>) -> String {
    if let Some(body) = body {
        for field in MESSAGE_FIELDS {
            if let Some(message) = body.get(field).and_then(field_text) {
                return message;
            }
        }
    }

    match transport {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

/// Text of a structured field, or None if the field is empty/falsy
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Generic message for a non-success HTTP status
pub fn status_message(status: u16) -> String {
    format!("Request failed with status code {}", status)
}

/// Generic message for a request that never got a response
pub fn transport_message(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        return format!("timeout of {}ms exceeded", timeout.as_millis());
    }

    // Walk the chain to the root cause (most informative for connect errors)
    let mut deepest = error.to_string();
    let mut source = StdError::source(error);
    while let Some(err) = source {
        deepest = err.to_string();
        source = err.source();
    }
    deepest
}

/// Text shown in an error notification
pub fn notification_text(message: &str) -> String {
    format!("{}{}", ERROR_MARKER, message)
}
