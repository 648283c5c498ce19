//! Structured configuration issues.
//!
//! Loaders report problems as a list of [`ConfigIssue`]s rather than failing
//! on the first one, so the CLI can print every warning and refuse to run
//! only when an [`Severity::Error`] is present.
//!
//! ```
//! use council_domain::config::validation::{ConfigIssue, ConfigIssueCode, Severity, has_errors};
//!
//! let issues = vec![ConfigIssue::warning(
//!     ConfigIssueCode::MissingCredential {
//!         provider: "groq".to_string(),
//!     },
//!     "GROQ_API_KEY is not set",
//! )];
//! assert!(!has_errors(&issues));
//! ```

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: a deliberation cannot run with this configuration.
    Error,
    /// Non-fatal: the run proceeds but some members will degrade.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A model entry is blank.
    EmptyModelName { field: String },
    /// A model entry names a provider tag that is not supported.
    UnknownProvider { field: String, provider: String },
    /// A numeric setting is outside its accepted range.
    OutOfRange { field: String },
    /// A model is routed to a provider without a credential.
    MissingCredential { provider: String },
    /// The council list is larger than allowed.
    CouncilSize { count: usize },
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Returns `true` if any issue is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
