//! Retry policy: bounded attempts with exponential backoff and jitter

use rand::Rng;
use std::time::Duration;

/// Upper bound on a single backoff sleep
const MAX_BACKOFF_SECS: f64 = 30.0;

/// How many attempts a provider call gets and how long to wait between them.
///
/// The sleep after attempt `n` is `backoff_base^n + uniform(-jitter, +jitter)`
/// seconds, floored at `min_delay`. There is no sleep after the last attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts; 0 is treated as 1
    pub max_retries: u32,
    pub backoff_base: f64,
    pub jitter: f64,
    /// Floor of every sleep, in seconds
    pub min_delay: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff_base: 2.0,
            jitter: 1.0,
            min_delay: 0.5,
        }
    }
}

impl RetryPolicy {
    /// Number of attempts actually made
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Sleep before the attempt following `attempt` (1-based), or `None` after the last one
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.attempts() {
            return None;
        }
        let offset = if self.jitter > 0.0 {
            rand::rng().random_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        Some(self.backoff_delay(attempt, offset))
    }

    /// Deterministic part of the backoff, with a given jitter offset
    pub fn backoff_delay(&self, attempt: u32, jitter_offset: f64) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.backoff_base.powi(exponent) + jitter_offset;
        let floor = self.min_delay.max(0.0);
        // NaN and infinity fall through `max`/`min` to the bounds.
        let secs = raw.max(floor).min(MAX_BACKOFF_SECS.max(floor));
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::from_secs_f64(MAX_BACKOFF_SECS))
    }
}
