//! Chat gateway port
//!
//! Defines the interface for sending one chat completion to any provider.

use async_trait::async_trait;
use council_domain::{ChatMessage, ProviderModelRef, SamplingParams};

/// Gateway for provider-agnostic chat completions
///
/// This port defines how the stages reach language models. Implementations
/// (adapters) live in the infrastructure layer.
///
/// `dispatch` never fails: transport problems, exhausted retries, and
/// unconfigured or unknown providers all come back as a fallback marker
/// (see [`council_domain::is_fallback`]).
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send `messages` to `model` and return the assistant text or a fallback marker
    async fn dispatch(
        &self,
        model: &ProviderModelRef,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> String;

    /// Release every connection pool this gateway has opened. Idempotent.
    async fn close(&self);
}
