//! Blind retry for server and transport failures.
//!
//! Runs strictly outside the auth phase: each attempt is a complete
//! [`AuthRetry::execute`](crate::auth_retry::AuthRetry::execute), and a
//! failure that ended in sign-out is never retried.

use crate::auth_retry::AuthFailure;
use crate::config::RetryConfig;

use std::future::Future;
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::warn;
use tokio::time::sleep as TokioSleep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// `0` disables blind retry; anything above one is treated as one.
    pub max_blind_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            max_blind_retries: config.max_blind_retries,
        }
    }
}

impl RetryPolicy {
    /// Retries actually granted for a call asking for `requested`.
    ///
    /// `requested > 0` buys exactly one extra attempt, never more.
    pub fn allowed_retries(&self, requested: u32) -> u32 {
        if requested == 0 {
            return 0;
        }
        self.max_blind_retries.min(1)
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_delay,
            initial_interval: self.initial_delay,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Re-runs `attempt` once more if it fails with a retryable error and
/// `policy.allowed_retries(max_retries)` grants it.
pub async fn with_blind_retry<T, F, Fut>(
    policy: &RetryPolicy,
    max_retries: u32,
    mut attempt: F,
) -> Result<T, AuthFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AuthFailure>>,
{
    let allowed = policy.allowed_retries(max_retries);
    let mut backoff = policy.backoff();
    let mut retries = 0;

    loop {
        let failure = match attempt().await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };

        if failure.signed_out || !failure.error.is_retryable() || retries >= allowed {
            return Err(failure);
        }

        retries += 1;
        let delay = backoff.next_backoff().unwrap_or(policy.max_delay);
        warn!(
            "Retrying after {} failure (retry {retries}/{allowed}, waiting {delay:?})",
            failure.error.category()
        );
        TokioSleep(delay).await;
    }
}
