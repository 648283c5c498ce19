//! Application layer for llm-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::CouncilDefaults;
pub use ports::{
    chat_gateway::ChatGateway,
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::conduct_reviews::ConductReviewsUseCase;
pub use use_cases::generate_opinions::GenerateOpinionsUseCase;
pub use use_cases::run_deliberation::RunDeliberationUseCase;
pub use use_cases::scatter::{GatherFailure, scatter_gather};
pub use use_cases::synthesize_verdict::SynthesizeVerdictUseCase;
