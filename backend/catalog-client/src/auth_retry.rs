//! Credential lifecycle around one logical request.
//!
//! ```text
//! Initial → Executing → Success
//!                     → Unauthorized → Refreshing → (no token) → sign out → Failed(original)
//!                                                 → Replaying → Success
//!                                                             → sign out → Failed(replay)
//! ```
//!
//! At most one replay is attempted per logical call.

use crate::classify::ErrorCategory;
use crate::error::ApiError;
use crate::http::{ApiResponse, RequestDescriptor, RequestExecutor};
use crate::session::TokenProvider;

use std::sync::Arc;

use log::{debug, warn};

/// Failure leaving the auth phase.
#[derive(Debug)]
pub struct AuthFailure {
    pub error: ApiError,
    /// The session was terminated while handling this call.
    pub signed_out: bool,
}

impl AuthFailure {
    fn surfaced(error: ApiError) -> Self {
        Self {
            error,
            signed_out: false,
        }
    }

    fn after_sign_out(error: ApiError) -> Self {
        Self {
            error,
            signed_out: true,
        }
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        failure.error
    }
}

/// Executes requests with a bounded refresh-and-replay on 401.
#[derive(Clone)]
pub struct AuthRetry {
    executor: Arc<dyn RequestExecutor>,
    tokens: TokenProvider,
}

impl AuthRetry {
    pub fn new(executor: Arc<dyn RequestExecutor>, tokens: TokenProvider) -> Self {
        Self { executor, tokens }
    }

    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse, AuthFailure> {
        let token = self
            .tokens
            .get_access_token(request.require_auth(), request.access_token())
            .await
            .map_err(AuthFailure::surfaced)?;

        let original = match self.executor.execute(request, token.as_ref()).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        if original.category() != ErrorCategory::Unauthorized || !request.retry_401() {
            return Err(AuthFailure::surfaced(original));
        }

        warn!(
            "{} {} rejected with 401, refreshing session",
            request.method(),
            request.path()
        );

        let Some(fresh) = self.tokens.force_refresh().await else {
            self.tokens.sign_out_and_redirect().await;
            return Err(AuthFailure::after_sign_out(original));
        };

        debug!("Replaying {} {} with refreshed token", request.method(), request.path());

        match self.executor.execute(request, Some(&fresh)).await {
            Ok(response) => Ok(response),
            Err(replay_error) => {
                warn!(
                    "Replay of {} {} failed: HTTP {} [{}]",
                    request.method(),
                    request.path(),
                    replay_error.status,
                    replay_error.code
                );
                self.tokens.sign_out_and_redirect().await;
                Err(AuthFailure::after_sign_out(replay_error))
            }
        }
    }
}
