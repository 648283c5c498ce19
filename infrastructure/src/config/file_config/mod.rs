//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Resolution into runtime settings happens once, in
//! [`FileConfig::provider_settings`] and [`FileConfig::council_defaults`].

mod council;
mod output;
mod providers;
mod retry;
mod timeouts;

pub use council::FileCouncilConfig;
pub use output::{ColorSetting, FileOutputConfig};
pub use providers::{FileProviderConfig, FileProvidersConfig};
pub use retry::FileRetryConfig;
pub use timeouts::FileTimeoutsConfig;

use crate::providers::settings::ProviderSettings;
use council_application::CouncilDefaults;
use council_domain::{ConfigIssue, ConfigIssueCode, Provider, ProviderModelRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default council and stage temperatures
    pub council: FileCouncilConfig,
    /// Per-provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Provider call retry policy
    pub retry: FileRetryConfig,
    /// Provider call timeouts
    pub timeouts: FileTimeoutsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks model references, council size, temperatures, retry and
    /// timeout values. Credentials are not checked here; see
    /// [`FileConfig::credential_issues`].
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.council.parse_models().1);
        issues.extend(self.council.parse_chairman().1);
        issues.extend(self.council.parse_review_temperature().1);
        issues.extend(self.council.parse_chairman_temperature().1);
        issues.extend(self.retry.to_policy().1);
        issues.extend(self.timeouts.to_timeouts().1);

        issues
    }

    /// Resolve client settings for every known provider, reading credentials
    /// from the process environment.
    pub fn provider_settings(&self) -> Vec<ProviderSettings> {
        self.provider_settings_with(|name| std::env::var(name).ok())
    }

    /// Like [`FileConfig::provider_settings`] with an explicit environment lookup
    pub fn provider_settings_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Vec<ProviderSettings> {
        let retry = self.retry.to_policy().0;
        let timeouts = self.timeouts.to_timeouts().0;

        Provider::known()
            .into_iter()
            .map(|provider| {
                let mut settings = ProviderSettings::defaults_for(provider.clone())
                    .with_retry(retry)
                    .with_timeouts(timeouts);
                if let Some(file) = self.providers.get(&provider) {
                    settings.api_key = file.resolve_api_key(&provider, &env);
                    if let Some(url) = &file.base_url {
                        settings.base_url = url.clone();
                    }
                    if file.referer.is_some() {
                        settings.referer = file.referer.clone();
                    }
                    if file.app_title.is_some() {
                        settings.app_title = file.app_title.clone();
                    }
                }
                settings
            })
            .collect()
    }

    /// Council defaults with any configured overrides applied
    pub fn council_defaults(&self) -> CouncilDefaults {
        let mut defaults = CouncilDefaults::default();
        if let Some(models) = self.council.parse_models().0 {
            defaults = defaults.with_council(models);
        }
        if let Some(chairman) = self.council.parse_chairman().0 {
            defaults = defaults.with_chairman(chairman);
        }
        if let Some(t) = self.council.parse_review_temperature().0 {
            defaults = defaults.with_review_temperature(t);
        }
        if let Some(t) = self.council.parse_chairman_temperature().0 {
            defaults = defaults.with_chairman_temperature(t);
        }
        defaults
    }

    /// Warn about providers used by `models` that have no credential.
    ///
    /// Absence is never fatal: the affected members degrade to a marker.
    pub fn credential_issues<'a>(
        models: impl IntoIterator<Item = &'a ProviderModelRef>,
        settings: &[ProviderSettings],
    ) -> Vec<ConfigIssue> {
        let used: BTreeSet<&Provider> = models
            .into_iter()
            .map(|m| m.provider())
            .filter(|p| p.is_known())
            .collect();

        used.into_iter()
            .filter(|provider| {
                !settings
                    .iter()
                    .any(|s| &s.provider == *provider && s.credential().is_some())
            })
            .map(|provider| {
                let var = provider.default_api_key_env().unwrap_or("api_key");
                ConfigIssue::warning(
                    ConfigIssueCode::MissingCredential {
                        provider: provider.to_string(),
                    },
                    format!(
                        "{} has no credential (set {} or providers.{}.api_key)",
                        provider.label(),
                        var,
                        provider
                    ),
                )
            })
            .collect()
    }
}
