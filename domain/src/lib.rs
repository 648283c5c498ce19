//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A council of models answers one prompt in three stages:
//!
//! 1. **Independent Opinions**: every council member answers on its own
//! 2. **Anonymous Cross-Review**: members score each other's answers without
//!    knowing who wrote them
//! 3. **Chairman Synthesis**: one model arbitrates the answers and critiques
//!    into a single verdict
//!
//! ## Fallback markers
//!
//! Failures never propagate as errors between layers. A failed call yields a
//! bracketed marker string, and [`is_fallback`] classifies any text as
//! success or failure.

pub mod config;
pub mod core;
pub mod deliberation;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity, has_errors};
pub use core::{
    error::DomainError,
    message::{ChatMessage, Role, SamplingParams},
    model_ref::ProviderModelRef,
    provider::Provider,
};
pub use deliberation::{
    anonymizer::{AnonymizedOpinions, anonymize_opinions},
    defaults::{default_chairman, default_council},
    entities::Stage,
    fallback::{FallbackMarker, is_fallback},
    parsing::{ReviewParseError, ReviewPayload, parse_review_payload, strip_code_fence},
    request::{DeliberationRequest, RequestError},
    value_objects::{
        DeliberationMeta, DeliberationTrace, DetailedScore, Opinion, RankingItem, Review,
        StageTimings,
    },
};
pub use prompt::PromptTemplate;
