//! Resolved per-provider client settings

use super::retry::RetryPolicy;
use council_domain::Provider;
use std::time::Duration;

/// Connect and read timeouts applied to every attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(8),
            read: Duration::from_secs(25),
        }
    }
}

/// Everything needed to build one provider's client.
///
/// `api_key` is `None` when no credential was found; the router then marks
/// the provider unconfigured instead of building a client.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    pub provider: Provider,
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL, without `/chat/completions`
    pub base_url: String,
    /// Sent as `HTTP-Referer` when set
    pub referer: Option<String>,
    /// Sent as `X-Title` when set
    pub app_title: Option<String>,
    pub timeouts: ClientTimeouts,
    pub retry: RetryPolicy,
}

impl ProviderSettings {
    /// Built-in settings for a provider, without a credential
    pub fn defaults_for(provider: Provider) -> Self {
        let base_url = provider.default_base_url().unwrap_or_default().to_string();
        let app_title = match provider {
            Provider::OpenRouter => Some("llm-council".to_string()),
            _ => None,
        };
        Self {
            provider,
            api_key: None,
            base_url,
            referer: None,
            app_title,
            timeouts: ClientTimeouts::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, timeouts: ClientTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// A usable, non-blank credential
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("timeouts", &self.timeouts)
            .field("retry", &self.retry)
            .finish()
    }
}
