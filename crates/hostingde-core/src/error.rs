//! Error types for the hosting.de DNS client
//!
//! This module defines all error types used throughout the workspace.

use crate::envelope::{ApiMessage, OBJECT_LOCKED};
use thiserror::Error;

/// Result type alias for hosting.de DNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hosting.de DNS client
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with an HTTP status other than 200
    #[error("Response from {url} did not have a status code of 200 (got {status})")]
    HttpStatus {
        /// URL that was requested
        url: String,
        /// HTTP status code of the response
        status: u16,
    },

    /// The API envelope reported `status: "error"`
    #[error("Api response from {path} returned errors: {}", describe_errors(.errors))]
    ApiResponse {
        /// API path that was called
        path: String,
        /// Every error entry the provider returned
        errors: Vec<ApiMessage>,
    },

    /// A find or resolve query returned no matches
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an HTTP status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create an API response error
    pub fn api_response(path: impl Into<String>, errors: Vec<ApiMessage>) -> Self {
        Self::ApiResponse {
            path: path.into(),
            errors,
        }
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::ObjectNotFound(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// First provider error of an [`Error::ApiResponse`], if any
    pub fn first_api_error(&self) -> Option<&ApiMessage> {
        match self {
            Self::ApiResponse { errors, .. } => errors.first(),
            _ => None,
        }
    }

    /// Whether this is an API error whose first entry is the object-locked code
    pub fn is_object_locked(&self) -> bool {
        self.first_api_error()
            .is_some_and(|error| error.code == OBJECT_LOCKED)
    }

    /// Whether this is an [`Error::ObjectNotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound(_))
    }
}

fn describe_errors(errors: &[ApiMessage]) -> String {
    match errors.first() {
        Some(first) if errors.len() > 1 => {
            format!("[{}]: {} (and {} more)", first.code, first.text, errors.len() - 1)
        }
        Some(first) => format!("[{}]: {}", first.code, first.text),
        None => "no error details".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(code: i64, text: &str) -> ApiMessage {
        ApiMessage {
            code,
            text: text.to_string(),
            ..ApiMessage::default()
        }
    }

    #[test]
    fn api_response_display_uses_first_error() {
        let err = Error::api_response(
            "/api/dns/v1/json/zoneUpdate",
            vec![message(10205, "Object is locked"), message(1, "other")],
        );

        let rendered = err.to_string();
        assert!(rendered.contains("[10205]: Object is locked"));
        assert!(rendered.contains("and 1 more"));
    }

    #[test]
    fn object_locked_detection() {
        let locked = Error::api_response("/x", vec![message(OBJECT_LOCKED, "locked")]);
        let other = Error::api_response("/x", vec![message(10100, "invalid")]);
        let empty = Error::api_response("/x", Vec::new());

        assert!(locked.is_object_locked());
        assert!(!other.is_object_locked());
        assert!(!empty.is_object_locked());
        assert!(!Error::not_found("zone").is_object_locked());
    }

    #[test]
    fn decode_failures_convert_to_json_errors() {
        let err: Error = serde_json::from_str::<ApiMessage>("{").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn http_status_display() {
        let err = Error::http_status("https://secure.hosting.de/api/dns/v1/json/zonesFind", 502);
        assert_eq!(
            err.to_string(),
            "Response from https://secure.hosting.de/api/dns/v1/json/zonesFind did not have a status code of 200 (got 502)"
        );
    }
}
