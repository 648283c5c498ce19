//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No council models configured")]
    NoModels,

    #[error("Invalid model reference: {0}")]
    InvalidModelRef(String),

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
}
