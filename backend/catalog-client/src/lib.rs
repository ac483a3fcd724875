//! Authenticated request client for the catalog admin API.
//!
//! Issues JSON calls against the backing REST API, attaches the session's
//! bearer credential, classifies every failure into one [`ApiError`] shape,
//! and recovers from an expired credential by refreshing the session and
//! replaying the call once before signing out.
//!
//! Layers, leaves first:
//! - [`classify`]: status → category → user message
//! - [`http`]: one round trip per call ([`http::RequestExecutor`])
//! - [`session`]: the [`session::SessionStore`] seam and [`session::TokenProvider`]
//! - [`auth_retry`]: bounded refresh-and-replay on 401
//! - [`retry`]: blind retry for server/transport failures
//! - [`client`]: `get_auth` / `post_auth` / `patch_auth` / `put_auth` / `delete_auth`

pub mod auth_retry;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod retry;
pub mod session;

#[cfg(test)]
mod tests;

pub use classify::ErrorCategory;
pub use client::CatalogClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ErrorCode, FieldError};
pub use http::RequestOptions;
pub use session::{MemorySessionStore, SessionStore};

pub use common::{AccessToken, HttpStatusCode};
