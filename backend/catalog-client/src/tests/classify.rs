// Unit tests for the failure taxonomy

use crate::classify::{ErrorCategory, classify, is_retryable, to_user_message};
use crate::error::{ApiError, ErrorCode, GENERIC_ERROR_MESSAGE};

use common::HttpStatusCode;

use serde_json::json;

/// **VALUE**: Verifies `classify` is total and lands every status in one of the nine categories.
///
/// **WHY THIS MATTERS**: Callers branch on the category to decide between retry,
/// redirect to sign-in, or showing field errors. A status with no category would
/// leave the caller without a decision.
#[test]
fn given_every_status_code_when_classified_then_returns_known_category() {
    for code in 0..=u16::MAX {
        let category = classify(HttpStatusCode(code));
        assert!(
            ErrorCategory::ALL.contains(&category),
            "status {code} produced an unlisted category"
        );
    }
}

#[test]
fn given_documented_status_codes_when_classified_then_maps_exactly() {
    let cases = [
        (0, ErrorCategory::NetworkError),
        (400, ErrorCategory::Validation),
        (422, ErrorCategory::Validation),
        (401, ErrorCategory::Unauthorized),
        (403, ErrorCategory::Forbidden),
        (404, ErrorCategory::NotFound),
        (409, ErrorCategory::Conflict),
        (429, ErrorCategory::RateLimit),
        (500, ErrorCategory::ServerError),
        (503, ErrorCategory::ServerError),
        (599, ErrorCategory::ServerError),
        (1000, ErrorCategory::ServerError),
        (200, ErrorCategory::Unknown),
        (302, ErrorCategory::Unknown),
        (405, ErrorCategory::Unknown),
        (418, ErrorCategory::Unknown),
        (1, ErrorCategory::Unknown),
    ];

    for (code, expected) in cases {
        assert_eq!(classify(HttpStatusCode(code)), expected, "status {code}");
    }
}

#[test]
fn given_category_when_displayed_then_uses_snake_case_name() {
    assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    assert_eq!(ErrorCategory::RateLimit.to_string(), "rate_limit");
    assert_eq!(
        serde_json::to_value(ErrorCategory::ServerError).unwrap(),
        json!("server_error")
    );
}

/// **VALUE**: Verifies `to_user_message` is never empty, whatever the failure looks like.
///
/// **WHY THIS MATTERS**: The UI renders this sentence directly. An empty toast
/// or banner tells the user nothing.
///
/// **BUG THIS CATCHES**: Would catch a status falling through both fallback tables,
/// or a blank server message being preferred over the tables.
#[test]
fn given_any_status_without_server_message_when_user_message_then_not_empty() {
    for code in 0..=u16::MAX {
        let error = ApiError::from_response(HttpStatusCode(code), &json!({}));
        let message = to_user_message(&error);
        assert!(!message.trim().is_empty(), "status {code} produced empty message");
    }
}

#[test]
fn given_server_message_when_user_message_then_prefers_server_text() {
    let error = ApiError::from_response(
        HttpStatusCode(409),
        &json!({ "message": "Slug 'dune' is already taken" }),
    );

    assert_eq!(to_user_message(&error), "Slug 'dune' is already taken");
}

#[test]
fn given_generic_placeholder_when_user_message_then_uses_status_table() {
    let error = ApiError::from_response(HttpStatusCode(404), &json!(null));

    assert_eq!(error.message, GENERIC_ERROR_MESSAGE);
    assert_eq!(
        to_user_message(&error),
        "The requested resource was not found."
    );
}

#[test]
fn given_unlisted_status_when_user_message_then_uses_category_table() {
    let error = ApiError::from_response(HttpStatusCode(507), &json!({}));

    assert_eq!(to_user_message(&error), "A server error occurred.");

    let error = ApiError::from_response(HttpStatusCode(418), &json!({}));
    assert_eq!(to_user_message(&error), "An unexpected error occurred.");
}

#[test]
fn given_blank_message_when_constructed_then_falls_back_to_placeholder() {
    let error = ApiError::new(HttpStatusCode(500), ErrorCode::HttpError, "   ");

    assert_eq!(error.message, GENERIC_ERROR_MESSAGE);
    assert_eq!(
        to_user_message(&error),
        "The server encountered an error. Please try again later."
    );
}

/// **VALUE**: Verifies only server and transport failures are retryable.
///
/// **BUG THIS CATCHES**: Would catch 401/422 being blindly retried, which would
/// resubmit invalid input or hammer the API with a dead credential.
#[test]
fn given_categories_when_is_retryable_then_only_server_and_network() {
    let retryable = [0, 500, 502, 503, 504];
    let not_retryable = [400, 401, 403, 404, 409, 422, 429, 200, 418];

    for code in retryable {
        let error = ApiError::from_response(HttpStatusCode(code), &json!({}));
        assert!(is_retryable(&error), "status {code} should be retryable");
    }

    for code in not_retryable {
        let error = ApiError::from_response(HttpStatusCode(code), &json!({}));
        assert!(!is_retryable(&error), "status {code} should not be retryable");
    }
}

/// **VALUE**: Verifies transport failures show the status-0 sentence, not reqwest's text.
///
/// **WHY THIS MATTERS**: reqwest errors include the full request URL and
/// connector internals. Admins should see "check your connection", and the
/// raw text stays in `message` for logs.
///
/// **BUG THIS CATCHES**: Would catch `to_user_message` reading the diagnostic
/// `message` field instead of the backend-supplied one.
#[test]
fn given_network_error_when_inspected_then_category_and_table_message_match() {
    let error = ApiError::network(
        "Connection failed: error sending request for url (http://127.0.0.1:9/api/books)",
    );

    assert_eq!(error.category(), ErrorCategory::NetworkError);
    assert!(error.is_retryable());
    assert!(error.server_message.is_none());
    assert!(error.message.contains("127.0.0.1:9"));
    assert_eq!(
        error.user_message(),
        "Unable to reach the server. Check your connection and try again."
    );
}

#[test]
fn given_parse_error_when_user_message_then_decoder_text_hidden() {
    let error = ApiError::parse(
        HttpStatusCode(502),
        "Malformed response body (HTTP 502): expected value at line 1 column 1",
    );

    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(
        error.user_message(),
        "The server is temporarily unreachable. Please try again later."
    );

    let error = ApiError::parse(HttpStatusCode(200), "Unexpected response shape: missing field `id`");
    assert_eq!(error.user_message(), "An unexpected error occurred.");
}

#[test]
fn given_local_failures_when_user_message_then_status_table_used() {
    assert_eq!(
        ApiError::missing_token().user_message(),
        "Your session has expired. Please sign in again."
    );
    assert_eq!(
        ApiError::invalid_request("Unserializable body: key must be a string").user_message(),
        "The request was invalid. Please check your input."
    );
}

#[test]
fn given_error_field_only_when_user_message_then_server_code_shown() {
    let error = ApiError::from_response(HttpStatusCode(409), &json!({ "error": "CATEGORY_IN_USE" }));

    assert_eq!(error.server_message.as_deref(), Some("CATEGORY_IN_USE"));
    assert_eq!(error.user_message(), "CATEGORY_IN_USE");
}
