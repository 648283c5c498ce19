//! Provider configuration from TOML (`[providers]` section)

use council_domain::Provider;
use serde::{Deserialize, Serialize};

/// One provider's endpoint and credential
///
/// ```toml
/// [providers.openrouter]
/// api_key_env = "OPENROUTER_API_KEY"
/// referer = "https://example.com"
/// app_title = "llm-council"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key (default: the provider's own)
    pub api_key_env: Option<String>,
    /// Direct API key (prefer the env var)
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// OpenRouter `HTTP-Referer` attribution header
    pub referer: Option<String>,
    /// OpenRouter `X-Title` attribution header
    pub app_title: Option<String>,
}

impl FileProviderConfig {
    /// Configured key, else the value of the key's environment variable
    pub fn resolve_api_key(
        &self,
        provider: &Provider,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }
        let var = self
            .api_key_env
            .as_deref()
            .or(provider.default_api_key_env())?;
        env(var).filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openrouter: FileProviderConfig,
    pub groq: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, provider: &Provider) -> Option<&FileProviderConfig> {
        match provider {
            Provider::OpenRouter => Some(&self.openrouter),
            Provider::Groq => Some(&self.groq),
            Provider::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "OPENROUTER_API_KEY" => Some("sk-or".to_string()),
            "MY_GROQ_KEY" => Some("gsk-custom".to_string()),
            "BLANK" => Some("   ".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_default_env_var() {
        let config = FileProviderConfig::default();
        assert_eq!(
            config.resolve_api_key(&Provider::OpenRouter, env),
            Some("sk-or".to_string())
        );
        assert_eq!(config.resolve_api_key(&Provider::Groq, env), None);
    }

    #[test]
    fn test_custom_env_var() {
        let config = FileProviderConfig {
            api_key_env: Some("MY_GROQ_KEY".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_api_key(&Provider::Groq, env),
            Some("gsk-custom".to_string())
        );
    }

    #[test]
    fn test_direct_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-direct".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_api_key(&Provider::OpenRouter, env),
            Some("sk-direct".to_string())
        );
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = FileProviderConfig {
            api_key: Some(String::new()),
            api_key_env: Some("BLANK".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(&Provider::OpenRouter, env), None);
    }

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[groq]
api_key_env = "MY_GROQ_KEY"
base_url = "http://localhost:9000/v1"
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.groq.base_url.as_deref(),
            Some("http://localhost:9000/v1")
        );
        assert_eq!(config.openrouter, FileProviderConfig::default());
        assert!(config.get(&Provider::Unknown("x".into())).is_none());
    }
}
