//! Timeout configuration from TOML (`[timeouts]` section)

use crate::providers::settings::ClientTimeouts;
use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    pub connect_secs: f64,
    pub read_secs: f64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        let timeouts = ClientTimeouts::default();
        Self {
            connect_secs: timeouts.connect.as_secs_f64(),
            read_secs: timeouts.read.as_secs_f64(),
        }
    }
}

impl FileTimeoutsConfig {
    pub fn to_timeouts(&self) -> (ClientTimeouts, Vec<ConfigIssue>) {
        let defaults = ClientTimeouts::default();
        let mut issues = Vec::new();

        let mut secs = |field: &str, value: f64, fallback: Duration| -> Duration {
            match Duration::try_from_secs_f64(value) {
                Ok(d) if !d.is_zero() => d,
                _ => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::OutOfRange {
                            field: format!("timeouts.{}", field),
                        },
                        format!("timeouts.{}: {} must be a positive number of seconds", field, value),
                    ));
                    fallback
                }
            }
        };

        let connect = secs("connect_secs", self.connect_secs, defaults.connect);
        let read = secs("read_secs", self.read_secs, defaults.read);
        (ClientTimeouts { connect, read }, issues)
    }
}
