//! Retry configuration and backoff logic.

use std::time::Duration;

/// Configuration for init retry behavior.
///
/// The delay doubles with each failed attempt: with the defaults, attempts
/// 1 through 3 wait 1000, 2000, and 4000 milliseconds. A failure once the
/// attempt budget is spent is terminal.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles per subsequent attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Sets the maximum number of retries.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Calculates the delay for a given retry attempt (1-indexed).
    ///
    /// `delay = base * 2^(attempt - 1)`; attempt 0 maps to zero for
    /// completeness.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.base_delay * 2u32.saturating_pow(attempt - 1)
    }

    /// Returns whether another retry should be made after `failed_retries`
    /// retries have already failed.
    pub fn should_retry(&self, failed_retries: u32) -> bool {
        failed_retries < self.max_attempts
    }
}
