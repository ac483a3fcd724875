// Test doubles shared by the orchestrator and retry tests

use crate::error::ApiError;
use crate::http::{ApiResponse, HttpMethod, RequestDescriptor, RequestExecutor, RequestOptions};

use common::{AccessToken, HttpStatusCode};

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

pub type Outcome = Result<ApiResponse, ApiError>;

/// Executor that replays a script, then repeats `fallback` forever.
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: AtomicUsize,
    tokens_seen: Mutex<Vec<Option<String>>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn always(outcome: Outcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<Option<String>> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _request: &RequestDescriptor,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen
            .lock()
            .unwrap()
            .push(token.map(|t| t.as_str().to_string()));

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn ok(body: Value) -> Outcome {
    Ok(ApiResponse {
        status: HttpStatusCode(200),
        body,
    })
}

pub fn books_page() -> Value {
    json!({ "items": [{ "id": 1, "slug": "dune" }], "page": 1, "total": 1 })
}

pub fn status_error(status: u16) -> Outcome {
    Err(ApiError::from_response(
        HttpStatusCode(status),
        &json!({ "message": format!("status {status}") }),
    ))
}

pub fn unauthorized() -> Outcome {
    Err(ApiError::from_response(
        HttpStatusCode(401),
        &json!({ "message": "jwt expired", "error": "Unauthorized" }),
    ))
}

pub fn get_books() -> RequestDescriptor {
    RequestDescriptor::new(
        HttpMethod::Get,
        "/books?page=1",
        None,
        RequestOptions::default(),
    )
}
