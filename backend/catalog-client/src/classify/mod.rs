//! Failure taxonomy: status code → category → user-facing sentence.
//!
//! Categories are derived from the numeric status only, so the same
//! failure classifies identically no matter how the backend words it.

mod messages;

use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};

use common::HttpStatusCode;

use std::fmt;

use serde::Serialize;

/// Stable failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimit,
    ServerError,
    NetworkError,
    Unknown,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 9] = [
        ErrorCategory::Validation,
        ErrorCategory::Unauthorized,
        ErrorCategory::Forbidden,
        ErrorCategory::NotFound,
        ErrorCategory::Conflict,
        ErrorCategory::RateLimit,
        ErrorCategory::ServerError,
        ErrorCategory::NetworkError,
        ErrorCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Conflict => "conflict",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::ServerError => "server_error",
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any status code to exactly one category.
pub fn classify(status: HttpStatusCode) -> ErrorCategory {
    match status.0 {
        0 => ErrorCategory::NetworkError,
        400 | 422 => ErrorCategory::Validation,
        401 => ErrorCategory::Unauthorized,
        403 => ErrorCategory::Forbidden,
        404 => ErrorCategory::NotFound,
        409 => ErrorCategory::Conflict,
        429 => ErrorCategory::RateLimit,
        code if code >= 500 => ErrorCategory::ServerError,
        _ => ErrorCategory::Unknown,
    }
}

/// Sentence suitable for display, never empty.
///
/// Resolution order:
/// 1. The backend's own message, unless it is blank or the generic placeholder
/// 2. The fixed message for the exact status code
/// 3. The fixed message for the status's category
///
/// Client-side text in [`ApiError::message`] (transport and decoder errors)
/// is never shown.
pub fn to_user_message(error: &ApiError) -> String {
    let server_message = error
        .server_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty() && *m != GENERIC_ERROR_MESSAGE);

    if let Some(message) = server_message {
        return message.to_string();
    }

    messages::for_status(error.status)
        .unwrap_or_else(|| messages::for_category(classify(error.status)))
        .to_string()
}

/// Only server and transport failures are worth a blind retry.
pub fn is_retryable(error: &ApiError) -> bool {
    matches!(
        classify(error.status),
        ErrorCategory::ServerError | ErrorCategory::NetworkError
    )
}
