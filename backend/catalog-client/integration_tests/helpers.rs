//! Test helpers for integration tests against a mock catalog API.

use catalog_client::config::RetryConfig;
use catalog_client::{AccessToken, CatalogClient, ClientConfig, MemorySessionStore};

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::MockServer;

pub const VALID_TOKEN: &str = "valid-token";
pub const EXPIRED_TOKEN: &str = "expired-token";
pub const FRESH_TOKEN: &str = "fresh-token";

/// Config pointed at the mock server's `/api` prefix with millisecond retry delays.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
        default_language: None,
        retry: RetryConfig {
            initial_delay_ms: 1,
            max_delay_ms: 5,
            max_blind_retries: 1,
        },
    }
}

pub fn store_with(token: &str) -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_token(AccessToken::new(token)))
}

pub fn client_for(server: &MockServer, store: Arc<MemorySessionStore>) -> CatalogClient {
    CatalogClient::new(&test_config(server), store).expect("Failed to build client")
}

pub fn books_page() -> Value {
    json!({
        "items": [
            { "id": 1, "slug": "dune", "title": "Dune" },
            { "id": 2, "slug": "solaris", "title": "Solaris" }
        ],
        "page": 1,
        "total": 2
    })
}
