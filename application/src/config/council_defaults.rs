//! Council defaults - process-wide models and stage parameters.
//!
//! [`CouncilDefaults`] fills in whatever a [`DeliberationRequest`] leaves
//! unspecified, and fixes the sampling parameters of the review and
//! synthesis stages.
//!
//! [`DeliberationRequest`]: council_domain::DeliberationRequest

use council_domain::{ProviderModelRef, SamplingParams, default_chairman, default_council};

/// Process-wide deliberation defaults.
///
/// | Stage | Temperature | Max tokens |
/// |-------|-------------|------------|
/// | Opinions | request | request |
/// | Review | `review_temperature` | `review_max_tokens` |
/// | Synthesis | `chairman_temperature` | max(2 × request, `chairman_min_tokens`) |
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilDefaults {
    /// Council used when the request names none (or an empty list)
    pub council: Vec<ProviderModelRef>,
    /// Chairman used when the request names none
    pub chairman: ProviderModelRef,
    pub review_temperature: f32,
    pub review_max_tokens: u32,
    pub chairman_temperature: f32,
    /// Floor of the chairman's token budget
    pub chairman_min_tokens: u32,
}

impl Default for CouncilDefaults {
    fn default() -> Self {
        Self {
            council: default_council(),
            chairman: default_chairman(),
            review_temperature: 0.3,
            review_max_tokens: 1024,
            chairman_temperature: 0.3,
            chairman_min_tokens: 2048,
        }
    }
}

impl CouncilDefaults {
    // ==================== Builder Methods ====================

    pub fn with_council(mut self, council: Vec<ProviderModelRef>) -> Self {
        self.council = council;
        self
    }

    pub fn with_chairman(mut self, chairman: ProviderModelRef) -> Self {
        self.chairman = chairman;
        self
    }

    pub fn with_review_temperature(mut self, temperature: f32) -> Self {
        self.review_temperature = temperature;
        self
    }

    pub fn with_chairman_temperature(mut self, temperature: f32) -> Self {
        self.chairman_temperature = temperature;
        self
    }

    // ==================== Stage Parameters ====================

    pub fn review_params(&self) -> SamplingParams {
        SamplingParams::new(self.review_temperature, self.review_max_tokens)
    }

    /// The verdict is longer than any single opinion, so the budget doubles.
    pub fn chairman_params(&self, request_max_tokens: u32) -> SamplingParams {
        let max_tokens = request_max_tokens
            .saturating_mul(2)
            .max(self.chairman_min_tokens);
        SamplingParams::new(self.chairman_temperature, max_tokens)
    }
}
