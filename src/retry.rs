//! Bounded retry with exponential backoff for catalog connection and fetch calls.
//!
//! The policy is an explicit value owned by each client and applied by wrapping
//! the remote call in [`with_retry`]. Exhausting the attempts turns the last
//! failure into [`SyncError::Connection`], which is fatal for the operation.

use std::{future::Future, time::Duration};

use tokio::time::sleep;

use crate::{SyncError, warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits, for tests and single-shot calls.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based): `initial * 2^retry`, capped.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_backoff)
    }
}

/// Runs `call` until it succeeds or the policy's attempts are used up.
///
/// Every failure is retried; the caller decides what is worth wrapping. Waits
/// between attempts follow [`RetryPolicy::backoff`].
///
/// # Errors
///
/// Returns [`SyncError::Connection`] carrying the last failure's message once
/// all attempts failed.
///
/// # Example
///
/// ```rust,ignore
/// let policy = RetryPolicy::default();
/// let server = with_retry(&policy, "Connect to Plex", || async {
///     fetch_identity(&client).await
/// })
/// .await?;
/// ```
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                let delay = policy.backoff(attempt - 1);
                warning!(
                    "{} failed (attempt {}/{}): {}. Retrying in {}s",
                    operation,
                    attempt,
                    attempts,
                    e,
                    delay.as_secs_f32()
                );
                sleep(delay).await;
            }
            Err(e) => {
                return Err(SyncError::Connection {
                    operation: operation.to_string(),
                    attempts,
                    message: e.to_string(),
                });
            }
        }
    }
}
