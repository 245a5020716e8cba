//! Backoff strategies between retry attempts.

use std::time::Duration;
use rand::Rng;

use crate::config::schema::{BackoffKind, RetryConfig};

/// Delay applied between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Constant(Duration),
    /// Doubling delay capped at `max_ms`, with up to 10% jitter.
    Exponential { base_ms: u64, max_ms: u64 },
}

impl Backoff {
    pub fn from_config(config: &RetryConfig) -> Self {
        match config.backoff {
            BackoffKind::Constant => Backoff::Constant(Duration::from_millis(config.base_delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base_ms: config.base_delay_ms,
                max_ms: config.max_delay_ms,
            },
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Constant(delay) => delay,
            Backoff::Exponential { base_ms, max_ms } => calculate_backoff(attempt, base_ms, max_ms),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Constant(Duration::from_millis(50))
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    // 0 to 10% of the delay
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
