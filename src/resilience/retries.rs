//! Retry logic.
//!
//! # Responsibilities
//! - Run a fallible async operation up to `max_attempts` times
//! - Wait the configured backoff between attempts
//! - Hand the last failure back to the caller once attempts are exhausted
//!
//! # Design Decisions
//! - Attempts are 1-based and visible to the operation (it may behave differently on the last one)
//! - `max_attempts` of 0 is treated as a single attempt

use std::fmt::Display;
use std::future::Future;

use crate::config::schema::RetryConfig;
use crate::observability::logging::duration_ms;
use crate::resilience::backoff::Backoff;

/// Context handed to each attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptContext {
    /// Current attempt, starting at 1.
    pub attempt: u32,
    /// Total attempts allowed.
    pub max_attempts: u32,
}

impl AttemptContext {
    pub fn is_last(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

/// Bounded retries with a fixed backoff strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Backoff::from_config(config))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute `operation` until it succeeds or attempts run out.
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut(AttemptContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            let ctx = AttemptContext {
                attempt,
                max_attempts: self.max_attempts,
            };
            match operation(ctx).await {
                Ok(value) => return Ok(value),
                Err(e) if ctx.is_last() => return Err(e),
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = duration_ms(delay),
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Backoff::default())
    }
}
