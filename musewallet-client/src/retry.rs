//! Retry policy for transport failures.

use musewallet_config::ApiConfig;
use std::time::Duration;

/// How many times a call is attempted and how long to wait in between.
///
/// The wait after failed attempt `n` (starting at 1) is `backoff_unit * 2^n`.
/// Only transport failures are retried; any HTTP status ends the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1.
    pub max_attempts: u32,
    /// Unit multiplied by the exponential factor.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy, clamping attempts to at least 1.
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Policy from the API section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.retry_attempts, config.backoff_unit)
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay after failed attempt `attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }

    /// Whether another attempt is allowed after `attempt`.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
