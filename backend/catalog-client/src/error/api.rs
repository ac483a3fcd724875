//! The classified failure raised by every request path.
//!
//! Key design decisions:
//! - HTTP status stored directly, category derived from it on demand
//! - Server error bodies are parsed into an all-optional [`ErrorBody`]
//! - Transport errors are mapped at the boundary, never exposed
//! - `#[track_caller]` constructors record where the failure was raised

use crate::classify::{self, ErrorCategory};

use common::{ErrorLocation, HttpStatusCode};

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

/// Message used when neither the server nor the transport supplied one.
pub const GENERIC_ERROR_MESSAGE: &str = "Request failed";

/// Machine-readable failure code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The response body was not valid JSON or did not match the expected shape.
    ParseError,
    /// No HTTP response was received.
    NetworkError,
    /// A credential was required but none was available.
    Unauthorized,
    /// The request could not be built (body serialization, URL construction).
    InvalidRequest,
    /// Non-2xx response without a server-supplied code.
    HttpError,
    /// The server's own `error` field, verbatim.
    Backend(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::ParseError => write!(f, "ParseError"),
            ErrorCode::NetworkError => write!(f, "NetworkError"),
            ErrorCode::Unauthorized => write!(f, "Unauthorized"),
            ErrorCode::InvalidRequest => write!(f, "InvalidRequest"),
            ErrorCode::HttpError => write!(f, "HttpError"),
            ErrorCode::Backend(code) => write!(f, "{code}"),
        }
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

/// Loosely-typed failure body returned by the backing API.
///
/// Every field is optional; backends are free to omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub details: Option<Vec<FieldError>>,
}

impl ErrorBody {
    /// Extracts whatever is recognizable from a parsed response body.
    ///
    /// Non-object bodies, and objects whose fields have unexpected types,
    /// yield an empty record instead of failing.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let details = object
            .get("details")
            .and_then(|d| serde_json::from_value::<Vec<FieldError>>(d.clone()).ok());

        Self {
            message: text("message"),
            error: text("error"),
            details,
        }
    }
}

/// Classified failure: the only error the request path ever returns.
#[derive(Debug, Clone, ThisError)]
#[error("API Error: HTTP {status} [{code}] {message} {location}")]
pub struct ApiError {
    /// Diagnostic text; may carry transport or decoder internals.
    pub message: String,
    /// Text the backend itself supplied, the only message safe to show as-is.
    pub server_message: Option<String>,
    pub status: HttpStatusCode,
    pub code: ErrorCode,
    pub details: Vec<FieldError>,
    pub location: ErrorLocation,
}

impl ApiError {
    #[track_caller]
    pub fn new(status: HttpStatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        ApiError {
            message,
            server_message: None,
            status,
            code,
            details: Vec::new(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transport failure with no HTTP response.
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(HttpStatusCode::NETWORK, ErrorCode::NetworkError, message)
    }

    /// Malformed server body; carries the status the transport reported.
    #[track_caller]
    pub fn parse(status: HttpStatusCode, message: impl Into<String>) -> Self {
        Self::new(status, ErrorCode::ParseError, message)
    }

    /// A credential was required and neither the caller nor the session had one.
    #[track_caller]
    pub fn missing_token() -> Self {
        Self::new(
            HttpStatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentication required",
        )
    }

    /// The request could not be constructed locally.
    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(HttpStatusCode::BAD_REQUEST, ErrorCode::InvalidRequest, message)
    }

    /// Builds a failure from a parsed non-2xx body.
    #[track_caller]
    pub fn from_response(status: HttpStatusCode, body: &Value) -> Self {
        let ErrorBody {
            message,
            error,
            details,
        } = ErrorBody::from_value(body);

        let code = match &error {
            Some(code) => ErrorCode::Backend(code.clone()),
            None => ErrorCode::HttpError,
        };
        let server_message = message.or(error);
        let diagnostic = server_message
            .clone()
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        let mut api_error = Self::new(status, code, diagnostic);
        api_error.server_message = server_message;
        api_error.details = details.unwrap_or_default();
        api_error
    }

    pub fn category(&self) -> ErrorCategory {
        classify::classify(self.status)
    }

    pub fn user_message(&self) -> String {
        classify::to_user_message(self)
    }

    pub fn is_retryable(&self) -> bool {
        classify::is_retryable(self)
    }

    /// Message of the first validation detail attached to `field`.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|detail| detail.field == field)
            .map(|detail| detail.message.as_str())
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // error_for_status() is never called, so no reqwest error carries a status.
        let message = if error.is_timeout() {
            format!("Request timed out: {error}")
        } else if error.is_connect() {
            format!("Connection failed: {error}")
        } else {
            error.to_string()
        };

        ApiError::network(message)
    }
}
