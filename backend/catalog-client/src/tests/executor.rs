// Unit tests for response parsing and endpoint construction

use crate::classify::ErrorCategory;
use crate::error::ErrorCode;
use crate::http::executor::{DEFAULT_TIMEOUT_DURATION, parse_response};
use crate::http::{HttpExecutor, HttpMethod, RequestDescriptor, RequestOptions};

use common::HttpStatusCode;

use serde_json::json;

#[test]
fn given_success_with_json_when_parsed_then_returns_body() {
    let response = parse_response(HttpStatusCode(200), br#"{"items":[],"total":0}"#).unwrap();

    assert_eq!(response.status, HttpStatusCode(200));
    assert_eq!(response.body, json!({ "items": [], "total": 0 }));
}

#[test]
fn given_success_with_blank_body_when_parsed_then_null() {
    let response = parse_response(HttpStatusCode(204), b"").unwrap();

    assert!(response.body.is_null());
}

/// **VALUE**: Verifies a malformed body becomes a `ParseError` carrying the transport's status.
///
/// **WHY THIS MATTERS**: A proxy's HTML 502 page or a truncated JSON payload is a
/// broken server response, not bad user input, and must not be reported as
/// validation or silently treated as success.
#[test]
fn given_malformed_body_when_parsed_then_parse_error_with_status() {
    let error = parse_response(HttpStatusCode(200), b"<html>oops</html>").unwrap_err();
    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(error.status, HttpStatusCode(200));

    let error = parse_response(HttpStatusCode(502), b"<html>Bad Gateway</html>").unwrap_err();
    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(error.category(), ErrorCategory::ServerError);
}

#[test]
fn given_failure_with_json_when_parsed_then_classified_from_body() {
    let error = parse_response(
        HttpStatusCode(404),
        br#"{"message":"Book not found","error":"NotFound"}"#,
    )
    .unwrap_err();

    assert_eq!(error.status, HttpStatusCode(404));
    assert_eq!(error.message, "Book not found");
    assert_eq!(error.code, ErrorCode::Backend("NotFound".to_string()));
    assert_eq!(error.category(), ErrorCategory::NotFound);
}

#[test]
fn given_base_with_path_prefix_when_endpoint_then_keeps_prefix_and_query() {
    let executor = HttpExecutor::new("https://api.example.com/api/v1/", DEFAULT_TIMEOUT_DURATION).unwrap();

    let url = executor.endpoint("/books?page=1").unwrap();

    assert_eq!(url.as_str(), "https://api.example.com/api/v1/books?page=1");

    let url = executor.endpoint("categories").unwrap();
    assert_eq!(url.as_str(), "https://api.example.com/api/v1/categories");
}

#[test]
fn given_get_descriptor_with_body_when_read_then_body_omitted() {
    let get = RequestDescriptor::new(
        HttpMethod::Get,
        "/books",
        Some(json!({ "ignored": true })),
        RequestOptions::default(),
    );
    let delete = RequestDescriptor::new(
        HttpMethod::Delete,
        "/books/1",
        Some(json!({ "ignored": true })),
        RequestOptions::default(),
    );
    let patch = RequestDescriptor::new(
        HttpMethod::Patch,
        "/books/1",
        Some(json!({ "title": "Dune" })),
        RequestOptions::default(),
    );

    assert!(get.body().is_none());
    assert!(delete.body().is_none());
    assert_eq!(patch.body(), Some(&json!({ "title": "Dune" })));
}

#[test]
fn given_default_options_when_descriptor_built_then_matches_documented_defaults() {
    let request = RequestDescriptor::new(HttpMethod::Get, "/tags", None, RequestOptions::default());

    assert!(request.require_auth());
    assert!(request.retry_401());
    assert_eq!(request.max_retries(), 0);
    assert!(request.access_token().is_none());
    assert!(request.language().is_none());

    let anonymous = RequestDescriptor::new(
        HttpMethod::Get,
        "/pages/about",
        None,
        RequestOptions::anonymous().with_language("en").no_retry_401(),
    );
    assert!(!anonymous.require_auth());
    assert!(!anonymous.retry_401());
    assert_eq!(anonymous.language(), Some("en"));
}
