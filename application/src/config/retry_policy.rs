//! Retry policy for remote calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff with additive jitter.
///
/// The delay after failed attempt `n` (0-based) is
/// `base_delay_ms × 2^n + jitter`, jitter drawn from `0..max_jitter_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total tries, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 1000,
            max_jitter_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64, max_jitter_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            max_jitter_ms,
        }
    }

    /// Minimum backoff before retrying after failed attempt `attempt`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Backoff including a jitter value already drawn by the caller.
    pub fn delay_with_jitter(&self, attempt: u32, jitter_ms: u64) -> Duration {
        self.base_delay(attempt) + Duration::from_millis(jitter_ms.min(self.max_jitter_ms))
    }
}
