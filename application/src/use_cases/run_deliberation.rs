//! Run Deliberation use case
//!
//! Orchestrates the full three-stage flow:
//! `Opinions → (Review | skipped) → Synthesis`.

use crate::config::CouncilDefaults;
use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::conduct_reviews::ConductReviewsUseCase;
use crate::use_cases::generate_opinions::GenerateOpinionsUseCase;
use crate::use_cases::synthesize_verdict::SynthesizeVerdictUseCase;
use council_domain::{
    DeliberationMeta, DeliberationRequest, DeliberationTrace, ProviderModelRef, SamplingParams,
    Stage, StageTimings,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const REVIEW_SKIPPED_WARNING: &str =
    "Stage 2 skipped: no council member produced a usable opinion";

/// Use case for running a full deliberation
///
/// Never returns an error: every failure below this level is already a
/// fallback marker inside the trace.
pub struct RunDeliberationUseCase<G: ChatGateway + 'static> {
    opinions: GenerateOpinionsUseCase<G>,
    reviews: ConductReviewsUseCase<G>,
    verdict: SynthesizeVerdictUseCase<G>,
    defaults: CouncilDefaults,
}

impl<G: ChatGateway + 'static> RunDeliberationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_defaults(gateway, CouncilDefaults::default())
    }

    pub fn with_defaults(gateway: Arc<G>, defaults: CouncilDefaults) -> Self {
        Self {
            opinions: GenerateOpinionsUseCase::new(Arc::clone(&gateway)),
            reviews: ConductReviewsUseCase::new(Arc::clone(&gateway)),
            verdict: SynthesizeVerdictUseCase::new(gateway),
            defaults,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, request: DeliberationRequest) -> DeliberationTrace {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: DeliberationRequest,
        progress: &dyn ProgressNotifier,
    ) -> DeliberationTrace {
        let council = self.resolve_council(&request);
        let chairman = request
            .chairman_model
            .clone()
            .unwrap_or_else(|| self.defaults.chairman.clone());
        let prompt = request.prompt.as_str();

        info!(
            "Starting deliberation with {} council members, chairman {}",
            council.len(),
            chairman
        );

        // Stage 1: Independent Opinions
        let started = Instant::now();
        let opinions = self
            .opinions
            .execute(
                prompt,
                &council,
                SamplingParams::new(request.temperature, request.max_tokens),
                progress,
            )
            .await;
        let stage1 = started.elapsed();
        let succeeded_opinions = opinions.iter().filter(|o| o.succeeded).count();

        // Stage 2: Anonymous Cross-Review (only with something to review)
        let mut warnings = Vec::new();
        let review_skipped = succeeded_opinions == 0;
        let started = Instant::now();
        let reviews = if review_skipped {
            warn!("{}", REVIEW_SKIPPED_WARNING);
            progress.on_stage_skipped(Stage::Review, REVIEW_SKIPPED_WARNING);
            warnings.push(REVIEW_SKIPPED_WARNING.to_string());
            Vec::new()
        } else {
            // Reviewers are the council members themselves.
            self.reviews
                .execute(
                    prompt,
                    &opinions,
                    &council,
                    self.defaults.review_params(),
                    progress,
                )
                .await
        };
        let stage2 = if review_skipped {
            Duration::ZERO
        } else {
            started.elapsed()
        };

        // Stage 3: Chairman Synthesis
        let started = Instant::now();
        let verdict = self
            .verdict
            .execute(
                prompt,
                &opinions,
                &reviews,
                &chairman,
                self.defaults.chairman_params(request.max_tokens),
                progress,
            )
            .await;
        let stage3 = started.elapsed();

        let timing = StageTimings::from_durations(stage1, stage2, stage3);
        let succeeded_reviews = reviews.iter().filter(|r| r.succeeded).count();
        info!(
            "Deliberation finished in {:.2}s ({}/{} opinions, {}/{} reviews)",
            timing.total_seconds,
            succeeded_opinions,
            council.len(),
            succeeded_reviews,
            reviews.len()
        );

        DeliberationTrace {
            original_prompt: request.prompt,
            meta: DeliberationMeta {
                timing,
                council_size: council.len(),
                succeeded_opinions,
                succeeded_reviews,
                chairman_model: chairman,
                review_skipped,
                warnings,
                completed_at: chrono::Utc::now(),
            },
            opinions,
            reviews,
            verdict,
        }
    }

    /// An absent or empty council list falls back to the defaults
    fn resolve_council(&self, request: &DeliberationRequest) -> Vec<ProviderModelRef> {
        match &request.council_models {
            Some(models) if !models.is_empty() => models.clone(),
            _ => self.defaults.council.clone(),
        }
    }
}
