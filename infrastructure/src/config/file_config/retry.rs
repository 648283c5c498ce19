//! Retry configuration from TOML (`[retry]` section)

use crate::providers::retry::RetryPolicy;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per provider call
    pub max_retries: u32,
    pub backoff_base: f64,
    /// Uniform jitter, in seconds either side
    pub backoff_jitter: f64,
    /// Minimum sleep between attempts, in seconds
    pub min_backoff: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            backoff_base: policy.backoff_base,
            backoff_jitter: policy.jitter,
            min_backoff: policy.min_delay,
        }
    }
}

impl FileRetryConfig {
    /// Convert to a [`RetryPolicy`]; out-of-range values fall back to defaults
    pub fn to_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let defaults = RetryPolicy::default();
        let mut issues = Vec::new();

        let mut check = |field: &str, value: f64, min: f64, fallback: f64| -> f64 {
            if value.is_finite() && value >= min {
                value
            } else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: format!("retry.{}", field),
                    },
                    format!("retry.{}: {} must be at least {}", field, value, min),
                ));
                fallback
            }
        };

        let backoff_base = check("backoff_base", self.backoff_base, 1.0, defaults.backoff_base);
        let jitter = check("backoff_jitter", self.backoff_jitter, 0.0, defaults.jitter);
        let min_delay = check("min_backoff", self.min_backoff, 0.0, defaults.min_delay);

        if self.max_retries == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "retry.max_retries".to_string(),
                },
                "retry.max_retries: 0 is treated as a single attempt",
            ));
        }

        (
            RetryPolicy {
                max_retries: self.max_retries,
                backoff_base,
                jitter,
                min_delay,
            },
            issues,
        )
    }
}
