use crate::helpers::{VALID_TOKEN, client_for, store_with, test_config};

use catalog_client::{
    CatalogClient, ErrorCategory, ErrorCode, HttpStatusCode, RequestOptions,
};

use serde::Deserialize;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies a 422 body's message, code and field details reach the caller.
///
/// **WHY THIS MATTERS**: Edit forms render `details` next to each input. Losing
/// them leaves the admin with a generic banner and no idea which field is wrong.
#[tokio::test]
async fn given_validation_failure_when_post_then_details_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation failed",
            "error": "VALIDATION_ERROR",
            "details": [
                { "field": "slug", "message": "Slug already taken" },
                { "field": "title", "message": "Title is required" }
            ]
        })))
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .post_auth::<Value, _>("/books", Some(&json!({ "slug": "dune" })), RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.status, HttpStatusCode(422));
    assert_eq!(error.category(), ErrorCategory::Validation);
    assert_eq!(error.code, ErrorCode::Backend("VALIDATION_ERROR".to_string()));
    assert_eq!(error.message, "Validation failed");
    assert_eq!(error.details.len(), 2);
    assert_eq!(error.field_message("slug"), Some("Slug already taken"));
    assert_eq!(error.user_message(), "Validation failed");
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn given_conflict_with_only_error_field_when_called_then_error_used_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/2"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "CATEGORY_IN_USE" })),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .delete_auth::<Value>("/categories/2", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Conflict);
    assert_eq!(error.message, "CATEGORY_IN_USE");
}

/// **VALUE**: Verifies an HTML error page from a proxy becomes a `ParseError`.
///
/// **BUG THIS CATCHES**: Would catch the raw serde error leaking out, or the
/// status being lost so the failure cannot be classified.
#[tokio::test]
async fn given_html_error_page_when_called_then_parse_error_with_transport_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(502)
                .set_body_raw("<html><body>Bad Gateway</body></html>", "text/html"),
        )
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .get_auth::<Value>("/books", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(error.status, HttpStatusCode(502));
    assert_eq!(error.category(), ErrorCategory::ServerError);
    assert!(error.server_message.is_none());
    assert_eq!(
        error.user_message(),
        "The server is temporarily unreachable. Please try again later."
    );
}

#[tokio::test]
async fn given_success_with_unexpected_shape_when_decoded_then_parse_error() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Book {
        id: u64,
        title: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "one" })))
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .get_auth::<Book>("/books/1", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ParseError);
    assert_eq!(error.status, HttpStatusCode(200));
    assert_eq!(error.category(), ErrorCategory::Unknown);
}

/// **VALUE**: Verifies an unreachable host yields status 0 / `NetworkError`.
///
/// **WHY THIS MATTERS**: The UI shows "check your connection" for this category
/// only. A transport failure misreported as a server error sends admins to the
/// wrong place.
#[tokio::test]
async fn given_unreachable_host_when_called_then_network_error() {
    // Port 9 (discard) is not listening in test environments.
    let mut config = test_config(&MockServer::start().await);
    config.base_url = "http://127.0.0.1:9/api".to_string();
    let client = CatalogClient::new(&config, store_with(VALID_TOKEN)).unwrap();

    let error = client
        .get_auth::<Value>("/books", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.status, HttpStatusCode::NETWORK);
    assert_eq!(error.code, ErrorCode::NetworkError);
    assert_eq!(error.category(), ErrorCategory::NetworkError);
    assert!(error.is_retryable());
    assert_eq!(
        error.user_message(),
        "Unable to reach the server. Check your connection and try again."
    );
    assert!(!error.user_message().contains("127.0.0.1"));
}

#[tokio::test]
async fn given_forbidden_without_body_when_called_then_table_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .get_auth::<Value>("/users", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Forbidden);
    assert_eq!(error.code, ErrorCode::HttpError);
    assert!(!error.user_message().is_empty());
    assert_ne!(error.user_message(), "Request failed");
}
