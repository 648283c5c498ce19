//! Provider value object identifying an upstream LLM vendor

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upstream chat-completion providers (Value Object)
///
/// Dispatch is by variant, never by string comparison at call sites.
/// Tags that do not name a supported provider are preserved as
/// [`Provider::Unknown`] so routing can report them without failing
/// at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    #[default]
    OpenRouter,
    Groq,
    Unknown(String),
}

impl Provider {
    /// Get the lowercase tag for this provider
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Groq => "groq",
            Provider::Unknown(s) => s,
        }
    }

    /// All providers with a concrete client implementation
    pub fn known() -> [Provider; 2] {
        [Provider::OpenRouter, Provider::Groq]
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Provider::Unknown(_))
    }

    /// Upper-case label used in operator-facing error markers
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Base URL of the OpenAI-compatible API, without the `/chat/completions` suffix
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some("https://openrouter.ai/api/v1"),
            Provider::Groq => Some("https://api.groq.com/openai/v1"),
            Provider::Unknown(_) => None,
        }
    }

    /// Environment variable holding this provider's API key
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.trim();
        Ok(match tag.to_ascii_lowercase().as_str() {
            "openrouter" => Provider::OpenRouter,
            "groq" => Provider::Groq,
            _ => Provider::Unknown(tag.to_string()),
        })
    }
}

impl From<&str> for Provider {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(provider) => provider,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Provider::from(s.as_str()))
    }
}
