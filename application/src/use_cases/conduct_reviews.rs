//! Stage 2: Anonymous Cross-Review
//!
//! Every reviewer receives the same anonymized block and returns a JSON
//! verdict. A reviewer whose output cannot be used is recorded as a failed
//! [`Review`]; it never affects the other reviewers.

use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::scatter::scatter_gather;
use council_domain::{
    ChatMessage, Opinion, PromptTemplate, ProviderModelRef, Review, SamplingParams, Stage,
    anonymize_opinions, parse_review_payload,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for the anonymous cross-review stage
pub struct ConductReviewsUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ChatGateway + 'static> ConductReviewsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Ask every reviewer to score the anonymized opinions.
    ///
    /// Returns exactly `reviewers.len()` reviews, in reviewer order.
    pub async fn execute(
        &self,
        prompt: &str,
        opinions: &[Opinion],
        reviewers: &[ProviderModelRef],
        params: SamplingParams,
        progress: &dyn ProgressNotifier,
    ) -> Vec<Review> {
        info!("Stage 2: Anonymous Cross-Review ({} reviewers)", reviewers.len());
        progress.on_stage_start(Stage::Review, reviewers.len());

        let anonymized = anonymize_opinions(opinions);
        debug!(identities = ?anonymized.identities, "Anonymized council responses");

        let messages = [
            ChatMessage::system(PromptTemplate::review_system()),
            ChatMessage::user(PromptTemplate::review_prompt(prompt, &anonymized.text)),
        ];

        let calls = reviewers.iter().map(|reviewer| {
            let gateway = Arc::clone(&self.gateway);
            let messages = &messages;
            async move {
                let raw = gateway.dispatch(reviewer, messages, params).await;
                let review = Self::to_review(reviewer, &raw);
                progress.on_member_complete(Stage::Review, reviewer, review.succeeded);
                review
            }
        });

        let reviews: Vec<Review> = scatter_gather(calls)
            .await
            .into_iter()
            .zip(reviewers)
            .map(|(slot, reviewer)| {
                slot.unwrap_or_else(|failure| {
                    warn!(reviewer = %reviewer, "Reviewer call aborted: {}", failure);
                    progress.on_member_complete(Stage::Review, reviewer, false);
                    Review::failed(reviewer.clone())
                })
            })
            .collect();

        progress.on_stage_complete(Stage::Review);
        reviews
    }

    fn to_review(reviewer: &ProviderModelRef, raw: &str) -> Review {
        match parse_review_payload(raw) {
            Ok(payload) => {
                debug!(
                    reviewer = %reviewer,
                    rankings = payload.rankings.len(),
                    scores = payload.detailed_scores.len(),
                    "Review parsed"
                );
                Review::parsed(reviewer.clone(), payload.rankings, payload.detailed_scores)
            }
            Err(e) => {
                warn!(reviewer = %reviewer, "Discarding review: {}", e);
                Review::failed(reviewer.clone())
            }
        }
    }
}
