//! Deliberation value objects - immutable result types for each stage.
//!
//! - [`Opinion`] - one council member's Stage 1 answer
//! - [`RankingItem`] / [`DetailedScore`] - a reviewer's structured verdict
//! - [`Review`] - one reviewer's Stage 2 output
//! - [`DeliberationTrace`] - the complete, terminal artifact

use super::fallback::is_fallback;
use crate::core::model_ref::ProviderModelRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stage 1 answer from a single council member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// 1-based position of the model in the council list; the only
    /// identity a reviewer ever sees
    pub response_id: u32,
    pub model_ref: ProviderModelRef,
    /// Answer text, or a fallback marker when the call failed
    pub text: String,
    pub succeeded: bool,
}

impl Opinion {
    /// Build an opinion from whatever text the provider layer returned.
    ///
    /// Success is decided by the fallback-marker predicate, so a client's
    /// degraded reply is recorded as a failure without any exception path.
    pub fn from_response(
        response_id: u32,
        model_ref: ProviderModelRef,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let succeeded = !is_fallback(&text);
        Self {
            response_id,
            model_ref,
            text,
            succeeded,
        }
    }

    /// Build an opinion for a member whose call did not produce any text
    pub fn failed(response_id: u32, model_ref: ProviderModelRef, marker: impl Into<String>) -> Self {
        Self {
            response_id,
            model_ref,
            text: marker.into(),
            succeeded: false,
        }
    }
}

/// A reviewer's overall score for one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    pub response_id: u32,
    #[serde(alias = "score_total")]
    pub total_score: f64,
}

/// A reviewer's per-criterion assessment of one response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedScore {
    pub response_id: u32,
    pub accuracy: u8,
    pub insight: u8,
    pub logic: u8,
    pub critique: String,
}

impl DetailedScore {
    /// Upper bound of each sub-score
    pub const MAX_SCORE: u8 = 10;

    /// First sub-score outside `0..=10`, as `(criterion, value)`
    pub fn out_of_range(&self) -> Option<(&'static str, u8)> {
        [
            ("accuracy", self.accuracy),
            ("insight", self.insight),
            ("logic", self.logic),
        ]
        .into_iter()
        .find(|(_, value)| *value > Self::MAX_SCORE)
    }
}

/// Stage 2 output of a single reviewer
///
/// A reviewer that failed outright or returned unusable output is kept with
/// `succeeded = false` and empty rankings/scores; it is never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: ProviderModelRef,
    pub rankings: Vec<RankingItem>,
    pub detailed_scores: Vec<DetailedScore>,
    pub succeeded: bool,
}

impl Review {
    pub fn parsed(
        reviewer: ProviderModelRef,
        rankings: Vec<RankingItem>,
        detailed_scores: Vec<DetailedScore>,
    ) -> Self {
        Self {
            reviewer,
            rankings,
            detailed_scores,
            succeeded: true,
        }
    }

    pub fn failed(reviewer: ProviderModelRef) -> Self {
        Self {
            reviewer,
            rankings: Vec::new(),
            detailed_scores: Vec::new(),
            succeeded: false,
        }
    }
}

/// Wall-clock duration of each stage, in seconds rounded to 2 decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub stage1_seconds: f64,
    pub stage2_seconds: f64,
    pub stage3_seconds: f64,
    pub total_seconds: f64,
}

impl StageTimings {
    pub fn from_durations(stage1: Duration, stage2: Duration, stage3: Duration) -> Self {
        Self {
            stage1_seconds: round_secs(stage1),
            stage2_seconds: round_secs(stage2),
            stage3_seconds: round_secs(stage3),
            total_seconds: round_secs(stage1 + stage2 + stage3),
        }
    }
}

fn round_secs(d: Duration) -> f64 {
    (d.as_secs_f64() * 100.0).round() / 100.0
}

/// Timing and participation statistics attached to a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationMeta {
    pub timing: StageTimings,
    pub council_size: usize,
    pub succeeded_opinions: usize,
    pub succeeded_reviews: usize,
    pub chairman_model: ProviderModelRef,
    pub review_skipped: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Complete result of one deliberation, handed to persistence/presentation as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationTrace {
    pub original_prompt: String,
    pub opinions: Vec<Opinion>,
    pub reviews: Vec<Review>,
    pub verdict: String,
    pub meta: DeliberationMeta,
}

impl DeliberationTrace {
    /// Returns an iterator over only the successful opinions.
    pub fn successful_opinions(&self) -> impl Iterator<Item = &Opinion> {
        self.opinions.iter().filter(|o| o.succeeded)
    }

    /// Returns an iterator over only the failed opinions.
    pub fn failed_opinions(&self) -> impl Iterator<Item = &Opinion> {
        self.opinions.iter().filter(|o| !o.succeeded)
    }

    /// Returns an iterator over only the successful reviews.
    pub fn successful_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| r.succeeded)
    }
}
