// Unit tests for crate-private behavior.
// Public API tests against a mock HTTP server live in integration_tests/.

mod auth_retry;
mod classify;
mod executor;
mod support;
