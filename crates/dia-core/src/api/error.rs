//! Error types for backend API calls.

use std::fmt;

use serde_json::Value;

/// Error category for a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-2xx HTTP response (carries the status code)
    HttpStatus(u16),
    /// Request timed out at the transport level
    Timeout,
    /// Request failed before an HTTP response was received
    Transport,
    /// Response body was not the expected JSON shape
    Parse,
    /// 2xx response with `success: false`
    Api,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus(status) => write!(f, "http_{status}"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Api => write!(f, "api_error"),
        }
    }
}

/// Error from a backend API call.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error.
    ///
    /// The backend reports failures as `{"success": false, "message": ...}`;
    /// when the body parses, the message is folded into the summary.
    pub fn http_status(status: u16, body: &str) -> Self {
        if !body.is_empty()
            && let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json.get("message").and_then(|v| v.as_str())
        {
            return Self {
                kind: ApiErrorKind::HttpStatus(status),
                message: msg.to_string(),
                details: Some(body.to_string()),
            };
        }
        Self {
            kind: ApiErrorKind::HttpStatus(status),
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates an application-level error from a `success: false` response.
    pub fn api(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "Request failed".to_string()
        } else {
            message
        };
        Self::new(ApiErrorKind::Api, message)
    }

    /// Creates a parse error with the offending body attached.
    pub fn parse(err: &serde_json::Error, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Malformed response: {err}"),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Returns true if this error means the session id is no longer valid
    /// on the backend.
    ///
    /// The backend answers 404 for unknown ids on most endpoints, and 400
    /// with an "Invalid session." message on the rest.
    pub fn is_stale_session(&self) -> bool {
        if matches!(self.kind, ApiErrorKind::HttpStatus(404)) {
            return true;
        }
        self.message.contains("Invalid session") || self.message.contains("Session not found")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ApiErrorKind::Timeout, "Request timed out")
        } else if err.is_connect() {
            Self::new(
                ApiErrorKind::Transport,
                format!("Cannot reach backend: {err}"),
            )
        } else {
            Self::new(ApiErrorKind::Transport, err.to_string())
        }
    }
}

/// Result type for backend API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// http_status: extracts the backend message from JSON error bodies.
    #[test]
    fn test_http_status_extracts_backend_message() {
        let err = ApiError::http_status(404, r#"{"success": false, "message": "Session not found"}"#);

        assert_eq!(err.kind, ApiErrorKind::HttpStatus(404));
        assert_eq!(err.message, "Session not found");
        assert!(err.details.is_some());
    }

    /// http_status: falls back to a generic summary for non-JSON bodies.
    #[test]
    fn test_http_status_plain_body() {
        let err = ApiError::http_status(502, "<html>bad gateway</html>");

        assert_eq!(err.message, "HTTP 502");
        assert_eq!(err.details.as_deref(), Some("<html>bad gateway</html>"));
    }

    /// is_stale_session: 404 always counts as stale.
    #[test]
    fn test_stale_on_404() {
        let err = ApiError::http_status(404, "");
        assert!(err.is_stale_session());
    }

    /// is_stale_session: backend "Invalid session." messages count regardless
    /// of status code.
    #[test]
    fn test_stale_on_invalid_session_message() {
        let err = ApiError::http_status(
            400,
            r#"{"success": false, "message": "Invalid session. Please create or select a session first."}"#,
        );
        assert!(err.is_stale_session());

        let err = ApiError::api("Invalid session.");
        assert!(err.is_stale_session());
    }

    /// is_stale_session: ordinary failures are not stale.
    #[test]
    fn test_not_stale_on_other_errors() {
        assert!(!ApiError::api("Analyzer failed to respond").is_stale_session());
        assert!(!ApiError::http_status(500, "").is_stale_session());
        assert!(!ApiError::new(ApiErrorKind::Timeout, "Request timed out").is_stale_session());
    }

    /// api: empty backend messages get a displayable fallback.
    #[test]
    fn test_api_error_empty_message_fallback() {
        let err = ApiError::api("");
        assert_eq!(err.message, "Request failed");
    }
}
