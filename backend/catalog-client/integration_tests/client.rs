use crate::helpers::{
    EXPIRED_TOKEN, FRESH_TOKEN, VALID_TOKEN, books_page, client_for, store_with, test_config,
};

use catalog_client::{
    AccessToken, CatalogClient, ErrorCategory, HttpStatusCode, MemorySessionStore, RequestOptions,
};

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Book {
    id: u64,
    slug: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct BookPage {
    items: Vec<Book>,
    total: u64,
}

// ----------------------------------------------------------------------------
// get_auth('/books?page=1') scenarios
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies a GET with a valid cached token returns the typed list.
#[tokio::test]
async fn given_valid_token_when_get_books_then_returns_parsed_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "1"))
        .and(header("authorization", format!("Bearer {VALID_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(books_page()))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_with(VALID_TOKEN);
    let client = client_for(&server, store.clone());

    let page: BookPage = client
        .get_auth("/books?page=1", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].slug, "dune");
    assert_eq!(store.refresh_count(), 0);
}

/// **VALUE**: End-to-end expiry recovery: 401, one refresh, one replay, parsed list.
///
/// **WHY THIS MATTERS**: This is what every list page relies on when an admin
/// leaves the tab open past the access token's lifetime.
///
/// **BUG THIS CATCHES**: Would catch the replay reusing the stale token, a second
/// refresh, or the replay's body being dropped in favor of the 401's.
#[tokio::test]
async fn given_expired_token_when_get_books_then_refreshes_once_and_returns_replayed_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", format!("Bearer {EXPIRED_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", format!("Bearer {FRESH_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(books_page()))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_with(EXPIRED_TOKEN);
    store.stage_refresh(AccessToken::new(FRESH_TOKEN)).await;
    let client = client_for(&server, store.clone());

    let page: Value = client
        .get_auth("/books?page=1", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(page, books_page());
    assert_eq!(store.refresh_count(), 1);
    assert_eq!(store.sign_out_count(), 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn given_refresh_fails_when_get_books_then_signed_out_with_original_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let store = store_with(EXPIRED_TOKEN);
    let client = client_for(&server, store.clone());

    let error = client
        .get_auth::<Value>("/books?page=1", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.category(), ErrorCategory::Unauthorized);
    assert_eq!(error.message, "jwt expired");
    assert_eq!(store.sign_out_count(), 1);
    assert!(store.is_signed_out());
}

#[tokio::test]
async fn given_no_session_token_when_get_auth_then_unauthorized_without_request() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySessionStore::new());
    let client = client_for(&server, store);

    let error = client
        .get_auth::<Value>("/books", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.status, HttpStatusCode(401));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ----------------------------------------------------------------------------
// Write verbs
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_new_book_when_post_auth_then_sends_json_body_and_returns_created() {
    let server = MockServer::start().await;
    let new_book = json!({ "slug": "dune", "title": "Dune" });
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .and(header("content-type", "application/json"))
        .and(body_json(new_book.clone()))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 7, "slug": "dune", "title": "Dune" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let created: Book = client
        .post_auth("/books", Some(&new_book), RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(
        created,
        Book {
            id: 7,
            slug: "dune".to_string(),
            title: "Dune".to_string()
        }
    );
}

#[tokio::test]
async fn given_changes_when_patch_and_put_auth_then_use_matching_verbs() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/chapters/3"))
        .and(body_json(json!({ "title": "Prologue" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 3 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/pages/about"))
        .and(body_json(json!({ "content": "<p>Hi</p>" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "slug": "about" })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let patched: Value = client
        .patch_auth(
            "/chapters/3",
            Some(&json!({ "title": "Prologue" })),
            RequestOptions::default(),
        )
        .await
        .unwrap();
    let replaced: Value = client
        .put_auth(
            "/pages/about",
            Some(&json!({ "content": "<p>Hi</p>" })),
            RequestOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(patched["id"], 3);
    assert_eq!(replaced["slug"], "about");
}

#[tokio::test]
async fn given_no_content_response_when_delete_auth_then_unit_result() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tags/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    client
        .delete_auth::<()>("/tags/12", RequestOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty(), "DELETE must not carry a body");
}

#[tokio::test]
async fn given_post_without_body_when_sent_then_request_body_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/books/1/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "published": true })))
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let _: Value = client
        .post_auth_empty("/books/1/publish", RequestOptions::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

// ----------------------------------------------------------------------------
// Options: language, anonymous, blind retry
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_default_language_when_call_sets_none_then_config_language_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("accept-language", "uk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let mut config = test_config(&server);
    config.default_language = Some("uk".to_string());
    let client = CatalogClient::new(&config, store_with(VALID_TOKEN)).unwrap();

    let _: Value = client
        .get_auth("/categories", RequestOptions::default())
        .await
        .unwrap();
    let _: Value = client
        .get_auth("/categories", RequestOptions::default().with_language("en"))
        .await
        .unwrap();
}

#[tokio::test]
async fn given_anonymous_options_when_get_then_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/slug-available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "available": true })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, Arc::new(MemorySessionStore::new()));

    let result: Value = client
        .get_auth("/books/slug-available?slug=dune", RequestOptions::anonymous())
        .await
        .unwrap();

    assert_eq!(result["available"], true);
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn given_flaky_server_when_max_retries_set_then_blind_retry_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "warming up" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let versions: Value = client
        .get_auth("/versions", RequestOptions::default().with_max_retries(2))
        .await
        .unwrap();

    assert_eq!(versions, json!([{ "id": 1 }]));
}

/// **VALUE**: Verifies a 5xx followed by an expired token on the blind retry
/// ends in one refresh, one replay and the parsed list.
///
/// **BUG THIS CATCHES**: Would catch the retried attempt skipping the auth
/// phase, or a second refresh being spent on the same logical call.
#[tokio::test]
async fn given_server_error_then_expired_token_when_blind_retried_then_refreshes_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", format!("Bearer {EXPIRED_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", format!("Bearer {EXPIRED_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", format!("Bearer {FRESH_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(books_page()))
        .expect(1)
        .mount(&server)
        .await;
    let store = store_with(EXPIRED_TOKEN);
    store.stage_refresh(AccessToken::new(FRESH_TOKEN)).await;
    let client = client_for(&server, store.clone());

    let page: Value = client
        .get_auth("/books?page=1", RequestOptions::default().with_max_retries(1))
        .await
        .unwrap();

    assert_eq!(page, books_page());
    assert_eq!(store.refresh_count(), 1);
    assert_eq!(store.sign_out_count(), 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn given_server_error_without_max_retries_when_get_then_single_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/versions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, store_with(VALID_TOKEN));

    let error = client
        .get_auth::<Value>("/versions", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(error.category(), ErrorCategory::ServerError);
    assert!(error.is_retryable());
}
