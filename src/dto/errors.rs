//! Uniform `{detail}` error body shared by the API client and the proxy.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Detail used when the backend cannot be reached at all.
pub const CONNECTION_ERROR_DETAIL: &str = "connection error";

/// Normalized error payload returned by every proxy route.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn connection_error() -> Self {
        Self::new(CONNECTION_ERROR_DETAIL)
    }
}

/// Error bodies the backend is known to produce.
#[derive(Deserialize)]
struct LooseErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
    error: Option<String>,
}

/// Extracts a human readable message from a failed backend response.
///
/// Looks at `detail` (string or validation list), then `message`, then
/// `error`, then the raw text, and finally the status reason phrase.
pub fn extract_detail(status: u16, body: &[u8]) -> String {
    if let Ok(loose) = serde_json::from_slice::<LooseErrorBody>(body) {
        let detail = loose.detail.and_then(|value| match value {
            serde_json::Value::String(text) => Some(text),
            serde_json::Value::Null => None,
            serde_json::Value::Array(items) => {
                let messages: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .map(str::to_string)
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            other => Some(other.to_string()),
        });
        if let Some(message) = detail.or(loose.message).or(loose.error) {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() && !text.starts_with('{') && !text.starts_with('<') {
        return text.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
