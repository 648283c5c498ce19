//! Provider call errors and their retry classification

use thiserror::Error;

/// Why a single provider attempt did not yield assistant text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Connect or read timeout
    #[error("timed out: {0}")]
    Timeout(String),

    /// Connection could not be established or was dropped
    #[error("connection failed: {0}")]
    Connect(String),

    /// HTTP 429
    #[error("rate limited by provider")]
    RateLimited,

    /// Any other non-2xx status
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    /// 2xx response without `choices[0].message.content`
    #[error("unexpected response payload: {0}")]
    Payload(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CallError {
    /// Transient failures are retried; everything else aborts the retry loop.
    ///
    /// | Error | Retryable |
    /// |-------|-----------|
    /// | `Timeout`, `Connect`, `RateLimited` | yes |
    /// | `Status` 5xx | yes |
    /// | `Status` other | no |
    /// | `Payload`, `Unexpected` | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            CallError::Timeout(_) | CallError::Connect(_) | CallError::RateLimited => true,
            CallError::Status { code, .. } => *code >= 500,
            CallError::Payload(_) | CallError::Unexpected(_) => false,
        }
    }

    /// Short machine-readable kind, used as a log field
    pub fn code(&self) -> &'static str {
        match self {
            CallError::Timeout(_) => "timeout",
            CallError::Connect(_) => "connect",
            CallError::RateLimited => "rate_limited",
            CallError::Status { .. } => "http_status",
            CallError::Payload(_) => "payload",
            CallError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<reqwest::Error> for CallError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CallError::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() || e.is_body() {
            CallError::Connect(e.to_string())
        } else if e.is_decode() {
            CallError::Payload(e.to_string())
        } else {
            CallError::Unexpected(e.to_string())
        }
    }
}
