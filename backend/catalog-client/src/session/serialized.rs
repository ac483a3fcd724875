//! Refresh de-duplication for stores that cannot refresh concurrently.

use super::SessionStore;

use common::AccessToken;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

/// Wraps a store so that concurrent `refresh` calls run one at a time.
///
/// A caller that queued behind a refresh which succeeded takes the token
/// that refresh produced instead of starting another one. Stores whose
/// refresh credential is single-use therefore spend it once per burst of
/// 401s rather than once per failing request.
pub struct SerializedRefreshStore<S> {
    inner: S,
    gate: Mutex<()>,
    generation: AtomicU64,
}

impl<S: SessionStore> SerializedRefreshStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of refreshes that produced a token.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<S: SessionStore> SessionStore for SerializedRefreshStore<S> {
    async fn read(&self) -> Option<AccessToken> {
        self.inner.read().await
    }

    async fn refresh(&self) -> Option<AccessToken> {
        let observed = self.generation.load(Ordering::Acquire);
        let _guard = self.gate.lock().await;

        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(token) = self.inner.read().await {
                debug!("Reusing token from a refresh that completed while waiting");
                return Some(token);
            }
        }

        let token = self.inner.refresh().await;
        if token.is_some() {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        token
    }

    async fn sign_out(&self) {
        self.inner.sign_out().await
    }
}
