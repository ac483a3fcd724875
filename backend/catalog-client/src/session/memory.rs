//! In-memory session store for tests and non-interactive contexts.

use super::SessionStore;
use crate::config::ACCESS_TOKEN_ENV;

use common::AccessToken;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

/// Session store held entirely in memory.
///
/// `refresh` hands out tokens staged with [`stage_refresh`](Self::stage_refresh)
/// in FIFO order; once the queue is empty refreshes fail.
#[derive(Default)]
pub struct MemorySessionStore {
    current: RwLock<Option<AccessToken>>,
    staged: Mutex<VecDeque<AccessToken>>,
    refresh_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    signed_out: AtomicBool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self {
            current: RwLock::new(Some(token)),
            ..Default::default()
        }
    }

    /// Seeds the store from `CATALOG_ACCESS_TOKEN`, for scripts and CI.
    pub fn from_env() -> Self {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::with_token(AccessToken::new(value)),
            _ => Self::new(),
        }
    }

    pub async fn set_token(&self, token: Option<AccessToken>) {
        *self.current.write().await = token;
    }

    /// Queue the token the next `refresh` call will produce.
    pub async fn stage_refresh(&self, token: AccessToken) {
        self.staged.lock().await.push_back(token);
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn is_signed_out(&self) -> bool {
        self.signed_out.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    async fn refresh(&self) -> Option<AccessToken> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        let next = self.staged.lock().await.pop_front()?;
        *self.current.write().await = Some(next.clone());
        self.signed_out.store(false, Ordering::SeqCst);
        Some(next)
    }

    async fn sign_out(&self) {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.signed_out.store(true, Ordering::SeqCst);
        *self.current.write().await = None;
    }
}
