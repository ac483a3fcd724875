//! Single point of contact with the ambient session store.
//!
//! Provides the [`SessionStore`] trait that the identity layer implements,
//! the [`TokenProvider`] the request path talks to, and two helpers:
//! - [`MemorySessionStore`] - in-memory store (tests, non-interactive use)
//! - [`SerializedRefreshStore`] - de-duplicates concurrent refreshes

mod memory;
mod serialized;

pub use memory::MemorySessionStore;
pub use serialized::SerializedRefreshStore;

use crate::error::ApiError;

use common::AccessToken;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

/// The ambient session store, owned by the identity layer.
///
/// The store keeps both credentials. This client only reads the access
/// credential, asks for a refresh, or signals sign-out.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Currently cached access credential, if any.
    async fn read(&self) -> Option<AccessToken>;

    /// Mint a new access credential from the refresh credential.
    async fn refresh(&self) -> Option<AccessToken>;

    /// End the session and send the user back to sign-in.
    async fn sign_out(&self);
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn read(&self) -> Option<AccessToken> {
        (**self).read().await
    }
    async fn refresh(&self) -> Option<AccessToken> {
        (**self).refresh().await
    }
    async fn sign_out(&self) {
        (**self).sign_out().await
    }
}

/// Resolves, refreshes, and revokes credentials for the request path.
#[derive(Clone)]
pub struct TokenProvider {
    store: Arc<dyn SessionStore>,
}

impl TokenProvider {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The store's cached credential; blank values count as absent.
    pub async fn get_current_token(&self) -> Option<AccessToken> {
        self.store.read().await.filter(|token| !token.is_empty())
    }

    /// Credential for one call.
    ///
    /// A caller-provided token wins over the store's. When `require_auth` is
    /// false the store is not consulted at all.
    pub async fn get_access_token(
        &self,
        require_auth: bool,
        provided: Option<&AccessToken>,
    ) -> Result<Option<AccessToken>, ApiError> {
        if !require_auth {
            return Ok(None);
        }

        if let Some(token) = provided.filter(|token| !token.is_empty()) {
            return Ok(Some(token.clone()));
        }

        match self.get_current_token().await {
            Some(token) => Ok(Some(token)),
            None => {
                debug!("No access token available for an authenticated request");
                Err(ApiError::missing_token())
            }
        }
    }

    /// Ask the store for a new credential.
    pub async fn force_refresh(&self) -> Option<AccessToken> {
        match self.store.refresh().await.filter(|token| !token.is_empty()) {
            Some(token) => {
                info!("Session refreshed ({} byte token)", token.len());
                Some(token)
            }
            None => {
                warn!("Session refresh did not yield a token");
                None
            }
        }
    }

    pub async fn sign_out_and_redirect(&self) {
        warn!("Signing out after unrecoverable authorization failure");
        self.store.sign_out().await;
    }
}
