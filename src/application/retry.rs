//! Timeouts and bounded retries for read-only remote calls.
//!
//! Only calls that cannot move value go through [`RetryPolicy::run`]. Approval
//! and submission run once, bounded by the confirmation timeout.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::{Result, Stage, UpstreamError};

/// Retry budget for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    initial_backoff: Duration,
    request_timeout: Duration,
}

impl RetryPolicy {
    /// `attempts` is clamped to at least one.
    #[must_use]
    pub fn new(attempts: u32, initial_backoff: Duration, request_timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            initial_backoff,
            request_timeout,
        }
    }

    /// A single attempt with a timeout.
    #[must_use]
    pub fn once(request_timeout: Duration) -> Self {
        Self::new(1, Duration::ZERO, request_timeout)
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Run `op` until it succeeds, fails terminally, or the budget runs out.
    ///
    /// Each attempt is bounded by the request timeout. Only recoverable
    /// errors are retried; the delay doubles after every failure.
    ///
    /// # Errors
    ///
    /// Returns the last error seen.
    pub async fn run<F, Fut, T>(&self, stage: Stage, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = self.initial_backoff;
        let mut attempt = 1;
        loop {
            match with_timeout(stage, self.request_timeout, op(attempt)).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts && e.is_recoverable() => {
                    warn!(
                        stage = %stage,
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Remote call failed, retrying"
                    );
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Bound `fut` by `limit`, mapping expiry to [`UpstreamError::Timeout`].
///
/// # Errors
///
/// Returns the future's own error, or a timeout.
pub async fn with_timeout<T>(
    stage: Stage,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            stage,
            secs: limit.as_secs(),
        }
        .into()),
    }
}
