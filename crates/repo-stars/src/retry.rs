//! Randomized exponential backoff for model calls.

use std::time::Duration;

/// How many times a failing model call is attempted, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Scales the exponential wait: the ceiling after the first failure.
    pub multiplier: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            max_delay: Duration::from_secs(40),
        }
    }
}

impl RetryPolicy {
    /// A policy which retries immediately, for tests and local tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            multiplier: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// The longest wait after the given failed attempt (1-based): `multiplier * 2^(n-1)`, capped.
    pub fn backoff_ceiling(&self, failed_attempt: u32) -> Duration {
        let exp = failed_attempt.saturating_sub(1).min(31);
        self.multiplier
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// A random wait drawn uniformly from zero up to [Self::backoff_ceiling].
    pub fn backoff(&self, failed_attempt: u32) -> Duration {
        self.backoff_ceiling(failed_attempt)
            .mul_f64(rand::random::<f64>())
    }
}
