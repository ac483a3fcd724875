// Unit tests for the refresh-and-replay state machine

use super::support::{ScriptedExecutor, books_page, get_books, ok, status_error, unauthorized};

use crate::auth_retry::AuthRetry;
use crate::classify::ErrorCategory;
use crate::error::ErrorCode;
use crate::http::{HttpMethod, RequestDescriptor, RequestOptions};
use crate::session::{MemorySessionStore, TokenProvider};

use common::{AccessToken, HttpStatusCode};

use std::sync::Arc;

fn orchestrator(
    executor: Arc<ScriptedExecutor>,
    store: Arc<MemorySessionStore>,
) -> AuthRetry {
    AuthRetry::new(executor, TokenProvider::new(store))
}

/// **VALUE**: Verifies the happy path returns the executor's value and never touches refresh.
///
/// **BUG THIS CATCHES**: Would catch a refactor that refreshes eagerly or always
/// replays, doubling API load for every successful call.
#[tokio::test]
async fn given_success_on_first_attempt_when_executed_then_returns_value_without_refresh() {
    let executor = Arc::new(ScriptedExecutor::always(ok(books_page())));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("valid")));

    let response = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap();

    assert_eq!(response.body, books_page());
    assert_eq!(executor.calls(), 1);
    assert_eq!(executor.tokens_seen(), vec![Some("valid".to_string())]);
    assert_eq!(store.refresh_count(), 0);
    assert_eq!(store.sign_out_count(), 0);
}

/// **VALUE**: Verifies an expired token is refreshed once and the same request replayed.
///
/// **WHY THIS MATTERS**: This is the whole point of the orchestrator: a list page
/// loaded after the access token lapses must still render, without the user
/// noticing the credential rotated.
#[tokio::test]
async fn given_expired_token_and_successful_refresh_when_executed_then_replays_with_new_token() {
    let executor = Arc::new(ScriptedExecutor::new(
        vec![unauthorized()],
        ok(books_page()),
    ));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("expired")));
    store.stage_refresh(AccessToken::new("fresh")).await;

    let response = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap();

    assert_eq!(response.body, books_page());
    assert_eq!(executor.calls(), 2);
    assert_eq!(
        executor.tokens_seen(),
        vec![Some("expired".to_string()), Some("fresh".to_string())]
    );
    assert_eq!(store.refresh_count(), 1);
    assert_eq!(store.sign_out_count(), 0);
}

/// **VALUE**: Verifies at most one replay, even when every attempt is rejected.
///
/// **WHY THIS MATTERS**: If the identity service keeps issuing tokens the API
/// rejects, an unbounded loop would spin forever refreshing and replaying.
///
/// **BUG THIS CATCHES**: Would catch recursion into the retry path on the replay's 401.
#[tokio::test]
async fn given_always_unauthorized_when_executed_then_exactly_two_calls_and_replay_error() {
    let executor = Arc::new(ScriptedExecutor::always(unauthorized()));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("expired")));
    for i in 0..5 {
        store.stage_refresh(AccessToken::new(format!("fresh-{i}"))).await;
    }

    let failure = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap_err();

    assert_eq!(executor.calls(), 2, "initial + one replay, never a third");
    assert_eq!(store.refresh_count(), 1);
    assert_eq!(store.sign_out_count(), 1);
    assert!(failure.signed_out);
    assert_eq!(failure.error.category(), ErrorCategory::Unauthorized);
    assert_eq!(executor.tokens_seen()[1], Some("fresh-0".to_string()));
}

/// **VALUE**: Verifies a failed refresh signs out once and surfaces the ORIGINAL failure.
///
/// **BUG THIS CATCHES**: Would catch replaying with a stale token, or raising a
/// synthetic "refresh failed" error that hides the server's own message.
#[tokio::test]
async fn given_refresh_returns_none_when_executed_then_signs_out_and_raises_original() {
    let executor = Arc::new(ScriptedExecutor::always(unauthorized()));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("expired")));

    let failure = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap_err();

    assert_eq!(executor.calls(), 1, "no replay without a new token");
    assert_eq!(store.refresh_count(), 1);
    assert_eq!(store.sign_out_count(), 1);
    assert!(failure.signed_out);
    assert_eq!(failure.error.message, "jwt expired");
    assert_eq!(failure.error.code, ErrorCode::Backend("Unauthorized".to_string()));
}

#[tokio::test]
async fn given_replay_fails_with_server_error_when_executed_then_signs_out_and_raises_replay_error() {
    let executor = Arc::new(ScriptedExecutor::new(vec![unauthorized()], status_error(500)));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("expired")));
    store.stage_refresh(AccessToken::new("fresh")).await;

    let failure = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap_err();

    assert_eq!(executor.calls(), 2);
    assert_eq!(store.sign_out_count(), 1);
    assert!(failure.signed_out);
    assert_eq!(failure.error.status, HttpStatusCode(500));
}

/// **VALUE**: Verifies `retry_401 = false` surfaces the 401 with no further calls.
#[tokio::test]
async fn given_retry_opt_out_when_unauthorized_then_raised_immediately() {
    let executor = Arc::new(ScriptedExecutor::always(unauthorized()));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("expired")));
    store.stage_refresh(AccessToken::new("fresh")).await;
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/books?page=1",
        None,
        RequestOptions::default().no_retry_401(),
    );

    let failure = orchestrator(executor.clone(), store.clone())
        .execute(&request)
        .await
        .unwrap_err();

    assert_eq!(executor.calls(), 1);
    assert_eq!(store.refresh_count(), 0);
    assert_eq!(store.sign_out_count(), 0);
    assert!(!failure.signed_out);
    assert_eq!(failure.error.category(), ErrorCategory::Unauthorized);
}

#[tokio::test]
async fn given_non_auth_failure_when_executed_then_raised_without_refresh() {
    for status in [400, 403, 404, 409, 422, 429, 500] {
        let executor = Arc::new(ScriptedExecutor::always(status_error(status)));
        let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("valid")));
        store.stage_refresh(AccessToken::new("fresh")).await;

        let failure = orchestrator(executor.clone(), store.clone())
            .execute(&get_books())
            .await
            .unwrap_err();

        assert_eq!(executor.calls(), 1, "status {status}");
        assert_eq!(store.refresh_count(), 0, "status {status}");
        assert_eq!(failure.error.status, HttpStatusCode(status));
    }
}

#[tokio::test]
async fn given_no_token_and_auth_required_when_executed_then_unauthorized_without_call() {
    let executor = Arc::new(ScriptedExecutor::always(ok(books_page())));
    let store = Arc::new(MemorySessionStore::new());

    let failure = orchestrator(executor.clone(), store.clone())
        .execute(&get_books())
        .await
        .unwrap_err();

    assert_eq!(executor.calls(), 0);
    assert_eq!(failure.error.status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(failure.error.code, ErrorCode::Unauthorized);
    assert_eq!(store.refresh_count(), 0);
}

#[tokio::test]
async fn given_provided_token_when_executed_then_used_over_session_token() {
    let executor = Arc::new(ScriptedExecutor::always(ok(books_page())));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("session")));
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/books",
        None,
        RequestOptions::default().with_token(AccessToken::new("explicit")),
    );

    orchestrator(executor.clone(), store)
        .execute(&request)
        .await
        .unwrap();

    assert_eq!(executor.tokens_seen(), vec![Some("explicit".to_string())]);
}

#[tokio::test]
async fn given_anonymous_request_when_executed_then_sent_without_token() {
    let executor = Arc::new(ScriptedExecutor::always(ok(books_page())));
    let store = Arc::new(MemorySessionStore::with_token(AccessToken::new("session")));
    let request = RequestDescriptor::new(
        HttpMethod::Get,
        "/pages/about",
        None,
        RequestOptions::anonymous(),
    );

    orchestrator(executor.clone(), store)
        .execute(&request)
        .await
        .unwrap();

    assert_eq!(executor.tokens_seen(), vec![None]);
}
