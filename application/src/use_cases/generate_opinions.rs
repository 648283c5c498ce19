//! Stage 1: Independent Opinions
//!
//! Scatters the prompt to every council member and gathers one [`Opinion`]
//! per member, in council order.

use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::scatter::scatter_gather;
use council_domain::{
    ChatMessage, FallbackMarker, Opinion, PromptTemplate, ProviderModelRef, SamplingParams, Stage,
    is_fallback,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for collecting independent council opinions
pub struct GenerateOpinionsUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ChatGateway + 'static> GenerateOpinionsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Query every council member concurrently.
    ///
    /// Returns exactly `council.len()` opinions; `response_id` is the
    /// 1-based position in `council`, independent of completion order.
    pub async fn execute(
        &self,
        prompt: &str,
        council: &[ProviderModelRef],
        params: SamplingParams,
        progress: &dyn ProgressNotifier,
    ) -> Vec<Opinion> {
        info!("Stage 1: Independent Opinions ({} members)", council.len());
        progress.on_stage_start(Stage::Opinions, council.len());

        let messages = [
            ChatMessage::system(PromptTemplate::opinion_system()),
            ChatMessage::user(prompt),
        ];

        let calls = council.iter().map(|model| {
            let gateway = Arc::clone(&self.gateway);
            let messages = &messages;
            async move {
                let text = gateway.dispatch(model, messages, params).await;
                progress.on_member_complete(Stage::Opinions, model, !is_fallback(&text));
                text
            }
        });

        let opinions: Vec<Opinion> = scatter_gather(calls)
            .await
            .into_iter()
            .zip(council)
            .enumerate()
            .map(|(index, (slot, model))| {
                let response_id = index as u32 + 1;
                match slot {
                    Ok(text) => {
                        let opinion = Opinion::from_response(response_id, model.clone(), text);
                        if opinion.succeeded {
                            debug!(model = %model, response_id, "Opinion received");
                        } else {
                            warn!(model = %model, response_id, "Council member failed: {}", opinion.text);
                        }
                        opinion
                    }
                    Err(failure) => {
                        warn!(model = %model, response_id, "Council member call aborted: {}", failure);
                        progress.on_member_complete(Stage::Opinions, model, false);
                        Opinion::failed(
                            response_id,
                            model.clone(),
                            FallbackMarker::orchestration_error(model.model()),
                        )
                    }
                }
            })
            .collect();

        progress.on_stage_complete(Stage::Opinions);
        opinions
    }
}
