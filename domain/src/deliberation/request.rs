//! Inbound deliberation request

use crate::core::model_ref::ProviderModelRef;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted prompt length, in characters
pub const PROMPT_CHARS: RangeInclusive<usize> = 3..=4096;
/// Accepted council size
pub const COUNCIL_SIZE: RangeInclusive<usize> = 1..=8;
/// Accepted sampling temperature
pub const TEMPERATURE: RangeInclusive<f32> = 0.0..=2.0;
/// Accepted per-member token budget
pub const MAX_TOKENS: RangeInclusive<u32> = 64..=4096;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// A request value violating one of the accepted bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("prompt must be {min}-{max} characters, got {actual}")]
    PromptLength {
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("council must have {min}-{max} models, got {actual}")]
    CouncilSize {
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("temperature must be within {min}-{max}, got {actual}")]
    Temperature { actual: f32, min: f32, max: f32 },

    #[error("max_tokens must be within {min}-{max}, got {actual}")]
    MaxTokens { actual: u32, min: u32, max: u32 },
}

/// Input for one deliberation
///
/// `council_models` and `chairman_model` fall back to process-wide defaults
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationRequest {
    pub prompt: String,
    #[serde(default)]
    pub council_models: Option<Vec<ProviderModelRef>>,
    #[serde(default)]
    pub chairman_model: Option<ProviderModelRef>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl DeliberationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            council_models: None,
            chairman_model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_council(mut self, models: Vec<ProviderModelRef>) -> Self {
        self.council_models = Some(models);
        self
    }

    pub fn with_chairman(mut self, model: ProviderModelRef) -> Self {
        self.chairman_model = Some(model);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Check every bound, reporting the first violation.
    ///
    /// The orchestrator does not call this; it is for the layer that
    /// accepts requests from users.
    pub fn validate(&self) -> Result<(), RequestError> {
        let chars = self.prompt.trim().chars().count();
        if !PROMPT_CHARS.contains(&chars) {
            return Err(RequestError::PromptLength {
                actual: chars,
                min: *PROMPT_CHARS.start(),
                max: *PROMPT_CHARS.end(),
            });
        }

        if let Some(models) = &self.council_models
            && !COUNCIL_SIZE.contains(&models.len())
        {
            return Err(RequestError::CouncilSize {
                actual: models.len(),
                min: *COUNCIL_SIZE.start(),
                max: *COUNCIL_SIZE.end(),
            });
        }

        if !TEMPERATURE.contains(&self.temperature) {
            return Err(RequestError::Temperature {
                actual: self.temperature,
                min: *TEMPERATURE.start(),
                max: *TEMPERATURE.end(),
            });
        }

        if !MAX_TOKENS.contains(&self.max_tokens) {
            return Err(RequestError::MaxTokens {
                actual: self.max_tokens,
                min: *MAX_TOKENS.start(),
                max: *MAX_TOKENS.end(),
            });
        }

        Ok(())
    }
}
