use super::ErrorCategory;

use common::HttpStatusCode;

pub(super) fn for_status(status: HttpStatusCode) -> Option<&'static str> {
    let message = match status.0 {
        0 => "Unable to reach the server. Check your connection and try again.",
        400 => "The request was invalid. Please check your input.",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This item conflicts with an existing one. Try a different value.",
        422 => "Some fields are invalid. Please review the form.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 => "The server encountered an error. Please try again later.",
        502 => "The server is temporarily unreachable. Please try again later.",
        503 => "The service is temporarily unavailable. Please try again later.",
        504 => "The server took too long to respond. Please try again later.",
        _ => return None,
    };

    Some(message)
}

pub(super) fn for_category(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Validation => "The submitted data is invalid.",
        ErrorCategory::Unauthorized => "Authentication is required.",
        ErrorCategory::Forbidden => "Access denied.",
        ErrorCategory::NotFound => "Not found.",
        ErrorCategory::Conflict => "The request conflicts with the current state.",
        ErrorCategory::RateLimit => "Rate limit exceeded.",
        ErrorCategory::ServerError => "A server error occurred.",
        ErrorCategory::NetworkError => "A network error occurred.",
        ErrorCategory::Unknown => "An unexpected error occurred.",
    }
}
