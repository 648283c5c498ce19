//! Provider adapters
//!
//! - [`resilient::ResilientProviderClient`] - one HTTP client per provider with retry and fallback
//! - [`router::ProviderRouter`] - the [`ChatGateway`](council_application::ChatGateway) adapter

pub mod error;
pub mod resilient;
pub mod retry;
pub mod router;
pub mod settings;

use async_trait::async_trait;
use council_domain::{ChatMessage, Provider, SamplingParams};

/// A single provider's chat capability
///
/// `chat` never fails; failures come back as fallback markers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn provider(&self) -> Provider;

    async fn chat(&self, model: &str, messages: &[ChatMessage], params: SamplingParams) -> String;

    /// Release the connection pool. Idempotent.
    async fn close(&self);
}
