//! Reference to one (provider, model) pair

use super::error::DomainError;
use super::provider::Provider;
use serde::{Deserialize, Serialize};

/// Identifies exactly one model hosted by one provider (Value Object)
///
/// Immutable once constructed; the model identifier is passed to the
/// provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderModelRef {
    provider: Provider,
    model: String,
}

impl ProviderModelRef {
    /// Create a reference, rejecting empty model identifiers
    pub fn new(provider: Provider, model: impl Into<String>) -> Result<Self, DomainError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::InvalidModelRef(
                "model identifier cannot be empty".to_string(),
            ));
        }
        Ok(Self { provider, model })
    }

    /// Reference to a compiled-in OpenRouter model id
    pub(crate) fn builtin(model: &str) -> Self {
        Self {
            provider: Provider::OpenRouter,
            model: model.to_string(),
        }
    }

    /// Shorthand for an OpenRouter model
    pub fn openrouter(model: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Provider::OpenRouter, model)
    }

    /// Shorthand for a Groq model
    pub fn groq(model: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Provider::Groq, model)
    }

    /// Parse `provider:model` or a bare OpenRouter model id.
    ///
    /// The text before the first `:` is treated as a provider tag only when it
    /// contains no `/`, so OpenRouter ids with a variant suffix such as
    /// `arcee-ai/trinity-mini:free` parse as bare model ids.
    ///
    /// ```
    /// use council_domain::{Provider, ProviderModelRef};
    ///
    /// let r = ProviderModelRef::parse("groq:llama-3.3-70b-versatile").unwrap();
    /// assert_eq!(r.provider(), &Provider::Groq);
    ///
    /// let r = ProviderModelRef::parse("arcee-ai/trinity-mini:free").unwrap();
    /// assert_eq!(r.provider(), &Provider::OpenRouter);
    /// assert_eq!(r.model(), "arcee-ai/trinity-mini:free");
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidModelRef(
                "model reference cannot be empty".to_string(),
            ));
        }

        match s.split_once(':') {
            Some((tag, model)) if !tag.contains('/') && !tag.is_empty() => {
                Self::new(Provider::from(tag), model)
            }
            _ => Self::openrouter(s),
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Human-friendly label: vendor prefix and `:variant` suffix removed
    pub fn short_name(&self) -> &str {
        let name = self.model.rsplit('/').next().unwrap_or(&self.model);
        name.split(':').next().unwrap_or(name)
    }
}

impl std::fmt::Display for ProviderModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

impl std::str::FromStr for ProviderModelRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
