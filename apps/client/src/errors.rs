use serde::Deserialize;
use thiserror::Error;

/// The four round-trips the client makes against the scan service.
/// Each one owns the fallback message shown when nothing better is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scan,
    ListHistory,
    FetchScan,
    AiSuggestions,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Scan => "Scan failed",
            Operation::ListHistory => "Failed to load history",
            Operation::FetchScan => "Failed to load scan",
            Operation::AiSuggestions => "AI suggestions failed",
        }
    }

    /// Whether a server-provided error body is surfaced to the user.
    /// History reads always collapse to their generic message.
    fn surfaces_body(self) -> bool {
        matches!(self, Operation::Scan | Operation::AiSuggestions)
    }
}

/// Client-level error type returned by every `ScanService` call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClientError {
    /// Human-readable message for the slot that displays this failure.
    ///
    /// Transport and decode failures are indistinguishable to the user: both
    /// fall back to the operation's fixed message.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            ClientError::Api { message, .. } if operation.surfaces_body() => {
                extract_error_message(message)
                    .unwrap_or_else(|| operation.fallback_message().to_string())
            }
            _ => operation.fallback_message().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<NestedError>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NestedError {
    Object { message: Option<String> },
    Text(String),
}

/// Best-effort message extraction from a non-2xx response body.
/// Prefers a JSON `message` field, then `error.message`, then the raw text.
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let nested = parsed.error.and_then(|e| match e {
            NestedError::Object { message } => message,
            NestedError::Text(text) => Some(text),
        });
        if let Some(message) = parsed
            .message
            .into_iter()
            .chain(nested)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
        {
            return Some(message);
        }
    }

    Some(body.to_string())
}
