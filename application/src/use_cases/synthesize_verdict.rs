//! Stage 3: Chairman Synthesis
//!
//! One call to the chairman model with the successful opinions and
//! critiques. Always returns text: a verdict or a chairman fallback marker.
//! Only markers emitted by the provider layer are wrapped; any other reply
//! is the verdict, passed through unchanged.

use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    ChatMessage, FallbackMarker, Opinion, PromptTemplate, ProviderModelRef, Review,
    SamplingParams, Stage,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for the chairman synthesis stage
pub struct SynthesizeVerdictUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ChatGateway + 'static> SynthesizeVerdictUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        prompt: &str,
        opinions: &[Opinion],
        reviews: &[Review],
        chairman: &ProviderModelRef,
        params: SamplingParams,
        progress: &dyn ProgressNotifier,
    ) -> String {
        info!("Stage 3: Chairman Synthesis ({})", chairman);
        progress.on_stage_start(Stage::Synthesis, 1);

        let messages = [
            ChatMessage::system(PromptTemplate::chairman_system()),
            ChatMessage::user(PromptTemplate::chairman_prompt(prompt, opinions, reviews)),
        ];

        let call = self.gateway.dispatch(chairman, &messages, params);
        let verdict = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(text) if FallbackMarker::is_emitted(&text) => {
                warn!(chairman = %chairman, "Chairman failed: {}", text);
                FallbackMarker::chairman_failed(chairman.model(), failure_kind(&text))
            }
            Ok(text) => text,
            Err(_) => {
                warn!(chairman = %chairman, "Chairman call panicked");
                FallbackMarker::chairman_failed(chairman.model(), "panic")
            }
        };

        let succeeded = !FallbackMarker::is_emitted(&verdict);
        progress.on_member_complete(Stage::Synthesis, chairman, succeeded);
        progress.on_stage_complete(Stage::Synthesis);
        verdict
    }
}

/// Marker text without its surrounding brackets
fn failure_kind(marker: &str) -> &str {
    marker.trim().trim_start_matches('[').trim_end_matches(']')
}
