use crate::helpers::VALID_TOKEN;

use catalog_client::AccessToken;
use catalog_client::http::{
    HttpExecutor, HttpMethod, RequestDescriptor, RequestExecutor, RequestOptions,
};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor_for(server: &MockServer) -> HttpExecutor {
    HttpExecutor::new(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("Failed to build executor")
}

/// **VALUE**: Verifies the base URL's path prefix survives and the query string is kept.
///
/// **BUG THIS CATCHES**: Would catch a switch to `Url::join`, which resolves
/// `/books` against the host root and silently drops `/api`.
#[tokio::test]
async fn given_prefixed_base_url_when_executed_then_prefix_and_query_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "2"))
        .and(query_param("search", "dune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/books?page=2&search=dune",
        None,
        RequestOptions::default(),
    );

    let response = executor_for(&server)
        .execute(&request, Some(&AccessToken::new(VALID_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body, json!({ "items": [] }));
}

#[tokio::test]
async fn given_token_and_language_when_executed_then_all_headers_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .and(header("authorization", format!("Bearer {VALID_TOKEN}").as_str()))
        .and(header("accept-language", "de"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/pages",
        None,
        RequestOptions::default().with_language("de"),
    );

    executor_for(&server)
        .execute(&request, Some(&AccessToken::new(VALID_TOKEN)))
        .await
        .unwrap();
}

#[tokio::test]
async fn given_no_token_and_no_language_when_executed_then_only_content_type_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/pages",
        None,
        RequestOptions::anonymous(),
    );

    executor_for(&server).execute(&request, None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    assert!(headers.get("authorization").is_none());
    assert!(headers.get("accept-language").is_none());
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
}

/// **VALUE**: Verifies a body handed to a GET or DELETE descriptor is never sent.
#[tokio::test]
async fn given_body_on_get_and_delete_when_executed_then_body_omitted() {
    let server = MockServer::start().await;
    Mock::given(path("/api/tags/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    let executor = executor_for(&server);
    let token = AccessToken::new(VALID_TOKEN);

    for verb in [HttpMethod::Get, HttpMethod::Delete] {
        let request = RequestDescriptor::new(
            verb,
            "/tags/1",
            Some(json!({ "ignored": true })),
            RequestOptions::default(),
        );
        let response = executor.execute(&request, Some(&token)).await.unwrap();
        assert_eq!(response.body, Value::Null);
    }

    for request in server.received_requests().await.unwrap() {
        assert!(request.body.is_empty(), "{} carried a body", request.method);
    }
}

#[tokio::test]
async fn given_body_on_patch_when_executed_then_json_sent() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/categories/4"))
        .and(body_json(json!({ "name": "Sci-Fi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 4 })))
        .expect(1)
        .mount(&server)
        .await;
    let request = RequestDescriptor::new(
        HttpMethod::Patch,
        "/categories/4",
        Some(json!({ "name": "Sci-Fi" })),
        RequestOptions::default(),
    );

    let response = executor_for(&server)
        .execute(&request, Some(&AccessToken::new(VALID_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.body["id"], 4);
}

#[test]
fn given_unparseable_base_url_when_executor_built_then_error() {
    assert!(HttpExecutor::new("not a url", Duration::from_secs(1)).is_err());
}
