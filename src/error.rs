//! Error types for the SnapAPI SDK.

use serde_json::Value;
use thiserror::Error;

/// Result type for SnapAPI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Code reported for errors raised before a request is sent.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Code reported when no HTTP response was received.
pub const CONNECTION_ERROR: &str = "CONNECTION_ERROR";
/// Code used when an error response carries no usable `error.code`.
pub const HTTP_ERROR: &str = "HTTP_ERROR";
/// Default code for an [`ApiError`] built without one.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Error reported by the API for a response with status >= 400.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{code}] {message}")]
pub struct ApiError {
    /// Human readable message.
    pub message: String,
    /// Machine readable error code.
    pub code: String,
    /// HTTP status code.
    pub status: u16,
    /// Structured details, when the API sent any.
    pub details: Option<Value>,
}

impl ApiError {
    /// Create an error with code `UNKNOWN_ERROR` and status 500.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: UNKNOWN_ERROR.to_string(),
            status: 500,
            details: None,
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Set the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Build an error from a failed response's status and body.
    ///
    /// Fields missing from the `{"error": {...}}` envelope, or not of the
    /// expected type, fall back to `"HTTP {status}"`, `HTTP_ERROR` and no
    /// details, each on its own. A body that is not JSON at all gets the
    /// full fallback.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<Value>(body).ok();
        let error = parsed.as_ref().and_then(|v| v.get("error")).filter(|e| e.is_object());
        let text = |key: &str| {
            error
                .and_then(|e| e.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            message: text("message").unwrap_or_else(|| format!("HTTP {}", status)),
            code: text("code").unwrap_or_else(|| HTTP_ERROR.to_string()),
            status,
            details: error
                .and_then(|e| e.get("details"))
                .filter(|d| !d.is_null())
                .cloned(),
        }
    }
}

/// Error types for the SnapAPI SDK.
#[derive(Error, Debug)]
pub enum Error {
    /// Required input was missing or malformed. Raised before any network
    /// activity.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, reset,
    /// timeout).
    #[error("Connection error: {message}")]
    Connection {
        /// Underlying transport error text
        message: String,
    },

    /// The API answered with status >= 400.
    #[error("API error ({}): {}", .0.status, .0)]
    Api(#[from] ApiError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn connection(message: impl Into<String>) -> Self {
        Error::Connection {
            message: message.into(),
        }
    }

    /// Machine readable code for this failure.
    pub fn code(&self) -> &str {
        match self {
            Error::Validation { .. } => VALIDATION_ERROR,
            Error::Connection { .. } => CONNECTION_ERROR,
            Error::Api(err) => &err.code,
            Error::Json(_) => "INVALID_RESPONSE",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status of the failed call; 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            Error::Api(err) => err.status,
            _ => 0,
        }
    }

    /// The bare message, without the kind prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            Error::Validation { message } | Error::Connection { message } => message.clone(),
            Error::Api(err) => err.message.clone(),
            Error::Json(err) => err.to_string(),
            Error::Config(message) => message.clone(),
        }
    }

    /// Structured details sent by the API, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Error::Api(err) => err.details.as_ref(),
            _ => None,
        }
    }

    /// True for transport-level failures where no response was received.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_defaults() {
        let err = ApiError::new("boom");
        assert_eq!(err.code, "UNKNOWN_ERROR");
        assert_eq!(err.status, 500);
        assert!(err.details.is_none());
        assert_eq!(err.to_string(), "[UNKNOWN_ERROR] boom");
    }

    #[test]
    fn test_from_response_full_envelope() {
        let body = br#"{"error":{"message":"bad url","code":"INVALID_URL","details":{"field":"url"}}}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.message, "bad url");
        assert_eq!(err.code, "INVALID_URL");
        assert_eq!(err.status, 422);
        assert_eq!(err.details, Some(json!({"field": "url"})));
    }

    #[test]
    fn test_from_response_partial_envelope() {
        let err = ApiError::from_response(403, br#"{"error":{"code":"PLAN_LIMIT"}}"#);
        assert_eq!(err.message, "HTTP 403");
        assert_eq!(err.code, "PLAN_LIMIT");

        let err = ApiError::from_response(400, br#"{"error":{"message":"nope"}}"#);
        assert_eq!(err.message, "nope");
        assert_eq!(err.code, "HTTP_ERROR");
    }

    #[test]
    fn test_from_response_fallbacks() {
        let bodies: [&[u8]; 4] = [b"", b"<html>502</html>", b"{}", br#"{"error":"flat string"}"#];
        for body in bodies {
            let err = ApiError::from_response(502, body);
            assert_eq!(err.message, "HTTP 502");
            assert_eq!(err.code, "HTTP_ERROR");
            assert_eq!(err.status, 502);
            assert!(err.details.is_none());
        }
    }

    #[test]
    fn test_from_response_keeps_well_typed_fields() {
        let err = ApiError::from_response(400, br#"{"error":{"code":"X","message":42}}"#);
        assert_eq!(err.code, "X");
        assert_eq!(err.message, "HTTP 400");

        let body = br#"{"error":{"message":"slow down","code":null,"details":[1,2]}}"#;
        let err = ApiError::from_response(429, body);
        assert_eq!(err.message, "slow down");
        assert_eq!(err.code, "HTTP_ERROR");
        assert_eq!(err.details, Some(json!([1, 2])));
    }

    #[test]
    fn test_error_accessors() {
        let err = Error::connection("connection reset by peer");
        assert_eq!(err.code(), "CONNECTION_ERROR");
        assert_eq!(err.status(), 0);
        assert!(err.is_connection());
        assert!(err.to_string().contains("connection reset by peer"));

        let err = Error::validation("URL is required");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.message(), "URL is required");

        let err: Error = ApiError::new("not found")
            .with_code("NOT_FOUND")
            .with_status(404)
            .into();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "not found");
    }
}
