use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One field-level validation problem from the backend, e.g.
/// `{"param": "email", "msg": "invalid"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub param: String,
    pub msg: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Operation superseded by logout")]
    Superseded,
}

/// Error body shape the backend emits. `message` and `error` are both seen
/// in the wild depending on the failing layer.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Vec<FieldError>,
}

/// Maximum length for error response bodies echoed into error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid dragging large payloads into logs
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        // Back the cut off to a char boundary; the limit is a byte offset and
        // may land inside a multi-byte sequence.
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    /// Classify a non-success HTTP response, preferring the backend's
    /// structured `{message, details}` payload over the raw body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let payload: ErrorPayload = serde_json::from_str(body).unwrap_or_default();
        let message = payload
            .message
            .or(payload.error)
            .unwrap_or_else(|| Self::truncate_body(body));

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            400..=499 => ApiError::Validation {
                message,
                details: payload.details,
            },
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// User-facing message, matching the backend payload when one was parsed.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Field-level validation problems, empty for every other error class.
    pub fn details(&self) -> &[FieldError] {
        match self {
            ApiError::Validation { details, .. } => details,
            _ => &[],
        }
    }

    /// True for the session-ending class that must cascade to logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn classifies_session_ending_status() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message": "bad token"}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn validation_error_carries_field_details() {
        let body = r#"{"message": "Validation failed", "details": [{"param": "email", "msg": "invalid"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);

        assert_eq!(err.message(), "Validation failed");
        assert_eq!(err.details().len(), 1);
        assert_eq!(err.details()[0].param, "email");
        assert_eq!(err.details()[0].msg, "invalid");
    }

    #[test]
    fn falls_back_to_raw_body_when_not_json() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream exploded");
        match err {
            ApiError::ServerError(msg) => assert_eq!(msg, "upstream exploded"),
            other => panic!("expected ServerError, got {:?}", other),
        }
    }

    #[test]
    fn accepts_error_key_as_message() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, r#"{"error": "not your tenant"}"#);
        match err {
            ApiError::AccessDenied(msg) => assert_eq!(msg, "not your tenant"),
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[test]
    fn truncates_oversized_bodies() {
        let body = "x".repeat(2 * MAX_ERROR_BODY_LENGTH);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.message();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < body.len());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // é is two bytes; an odd-length prefix puts the cut mid-sequence.
        let body = format!("x{}", "é".repeat(MAX_ERROR_BODY_LENGTH));
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.message();
        assert!(msg.contains(&format!("truncated, {} total bytes", body.len())));
    }

    #[test]
    fn non_validation_errors_have_no_details() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(err.details().is_empty());
    }
}
