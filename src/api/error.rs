//! API Error Types
//!
//! Every service wrapper funnels transport and HTTP failures through
//! [`ApiError`], a `{status, message, details}` triple that callers can show
//! to the user as-is.

use serde_json::Value;
use thiserror::Error;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Normalized failure of a microservice call
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status, absent when the request never got a response
    pub status: Option<u16>,
    /// Human-readable message, preferring the backend's own `message` field
    pub message: String,
    /// Raw response body (JSON when it parsed, otherwise the text)
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Build from a non-success response
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_body(status.as_u16(), status.canonical_reason(), &body)
    }

    /// Build from a status line and body text
    pub fn from_body(status: u16, reason: Option<&str>, body: &str) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.to_string())),
            )
        };

        let message = details
            .as_ref()
            .and_then(body_message)
            .or_else(|| reason.map(|reason| format!("HTTP {status} {reason}")))
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            status: Some(status),
            message,
            details,
        }
    }

    /// Build from a transport-level failure (connect, timeout, body read)
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timeout".to_string()
        } else if err.is_connect() {
            format!("Service unavailable: {err}")
        } else {
            let text = err.to_string();
            if text.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                text
            }
        };

        Self {
            status: err.status().map(|s| s.as_u16()),
            message,
            details: None,
        }
    }

    /// Build from a success response whose body did not match the expected shape
    pub(crate) fn from_decode(status: u16, err: impl std::fmt::Display) -> Self {
        Self::new(Some(status), format!("Invalid response body: {err}"))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Pull the backend's `message` (or `error`) field out of a JSON body
fn body_message(details: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| details.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_body(
            400,
            Some("Bad Request"),
            r#"{"message": "DNI already registered", "code": 12}"#,
        );
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "DNI already registered");
        assert_eq!(err.to_string(), "DNI already registered");
        assert_eq!(
            err.details,
            Some(json!({"message": "DNI already registered", "code": 12}))
        );
    }

    #[test]
    fn test_spring_style_error_field() {
        let err = ApiError::from_body(
            500,
            Some("Internal Server Error"),
            r#"{"status": 500, "error": "Internal Server Error", "message": ""}"#,
        );
        assert_eq!(err.message, "Internal Server Error");
    }

    #[test]
    fn test_falls_back_to_status_line() {
        let err = ApiError::from_body(404, Some("Not Found"), "");
        assert_eq!(err.message, "HTTP 404 Not Found");
        assert!(err.details.is_none());
        assert!(err.is_not_found());

        let err = ApiError::from_body(599, None, "upstream exploded");
        assert_eq!(err.message, "HTTP 599");
        assert_eq!(err.details, Some(Value::String("upstream exploded".into())));
    }

    #[test]
    fn test_unauthorized() {
        assert!(ApiError::from_body(401, Some("Unauthorized"), "").is_unauthorized());
        assert!(!ApiError::new(None, "offline").is_unauthorized());
    }
}
