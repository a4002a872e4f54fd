//! Voice-agent API error types

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Keys tried, in order, for a human-readable message in an error body
const MESSAGE_KEYS: &[&str] = &["message", "error", "error_message", "detail"];

/// Failure talking to the voice-agent API
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required setting is absent
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    /// The API answered with a non-success status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Network failure or an unreadable response
    #[error("{0}")]
    Transport(String),
}

impl ProxyError {
    pub fn upstream(status: StatusCode, body: &str, fallback: &str) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            message: upstream_message(status, body, fallback),
        }
    }
}

/// Pick the message to surface for a failed upstream call: a message field
/// from a JSON body, else the status reason, else `fallback`.
pub fn upstream_message(status: StatusCode, body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| message_from_body(&v))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

fn message_from_body(body: &Value) -> Option<String> {
    MESSAGE_KEYS.iter().find_map(|key| match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(nested) => match nested.get("message") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        _ => None,
    })
}
