//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::Provider`] - upstream providers (OpenRouter, Groq, or an unknown tag)
//! - [`model_ref::ProviderModelRef`] - one model on one provider
//! - [`message::ChatMessage`] - a `{role, content}` chat entry
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod message;
pub mod model_ref;
pub mod provider;
