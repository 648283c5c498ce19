//! Provider router: enum dispatch from a model reference to its client

use super::ChatProvider;
use super::resilient::ResilientProviderClient;
use super::settings::ProviderSettings;
use async_trait::async_trait;
use council_application::ports::chat_gateway::ChatGateway;
use council_domain::{ChatMessage, FallbackMarker, Provider, ProviderModelRef, SamplingParams};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolved availability of one provider
#[derive(Clone)]
pub enum ProviderSlot {
    Ready(Arc<dyn ChatProvider>),
    /// Known provider without a credential
    Unconfigured,
}

/// Routes each call to the client of the model's provider.
///
/// Availability is resolved once at construction. Missing credentials and
/// unknown provider tags become inline fallback markers, so `dispatch`
/// never fails.
pub struct ProviderRouter {
    slots: BTreeMap<Provider, ProviderSlot>,
}

impl ProviderRouter {
    /// A router with no providers; every known provider reports unconfigured
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Build one slot per settings entry.
    ///
    /// Clients are cheap to construct; their connection pools open on first call.
    pub fn from_settings(settings: impl IntoIterator<Item = ProviderSettings>) -> Self {
        settings.into_iter().fold(Self::new(), |router, s| {
            let key = s.credential().map(str::to_string);
            match key {
                Some(key) => {
                    router.with_provider(Arc::new(ResilientProviderClient::new(s, key)))
                }
                None => {
                    debug!(provider = %s.provider, "No credential, provider disabled");
                    router.with_unconfigured(s.provider)
                }
            }
        })
    }

    pub fn with_provider(mut self, client: Arc<dyn ChatProvider>) -> Self {
        self.slots
            .insert(client.provider(), ProviderSlot::Ready(client));
        self
    }

    pub fn with_unconfigured(mut self, provider: Provider) -> Self {
        self.slots.insert(provider, ProviderSlot::Unconfigured);
        self
    }

    pub fn is_configured(&self, provider: &Provider) -> bool {
        matches!(self.slots.get(provider), Some(ProviderSlot::Ready(_)))
    }

    /// Providers with a ready client
    pub fn configured_providers(&self) -> Vec<Provider> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, ProviderSlot::Ready(_)))
            .map(|(provider, _)| provider.clone())
            .collect()
    }
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatGateway for ProviderRouter {
    async fn dispatch(
        &self,
        model: &ProviderModelRef,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> String {
        let provider = model.provider();
        if let Provider::Unknown(tag) = provider {
            warn!(model = %model, "Unknown provider '{}'", tag);
            return FallbackMarker::unknown_provider(tag);
        }

        match self.slots.get(provider) {
            Some(ProviderSlot::Ready(client)) => client.chat(model.model(), messages, params).await,
            Some(ProviderSlot::Unconfigured) | None => {
                warn!(model = %model, "{} is not configured", provider.label());
                FallbackMarker::provider_not_configured(&provider.label())
            }
        }
    }

    async fn close(&self) {
        let ready = self.slots.values().filter_map(|slot| match slot {
            ProviderSlot::Ready(client) => Some(client.close()),
            ProviderSlot::Unconfigured => None,
        });
        join_all(ready).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::retry::RetryPolicy;
    use crate::providers::settings::ClientTimeouts;
    use council_application::RunDeliberationUseCase;
    use council_domain::DeliberationRequest;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // -- Mock ChatProvider -----------------------------------------------------

    struct MockProvider {
        provider: Provider,
        calls: Mutex<Vec<String>>,
        closes: AtomicUsize,
    }

    impl MockProvider {
        fn new(provider: Provider) -> Arc<Self> {
            Arc::new(Self {
                provider,
                calls: Mutex::new(Vec::new()),
                closes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatProvider for MockProvider {
        fn provider(&self) -> Provider {
            self.provider.clone()
        }

        async fn chat(
            &self,
            model: &str,
            _messages: &[ChatMessage],
            _params: SamplingParams,
        ) -> String {
            self.calls.lock().unwrap().push(model.to_string());
            format!("{} says hi", self.provider)
        }

        async fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn params() -> SamplingParams {
        SamplingParams::new(0.7, 128)
    }

    // -- dispatch tests ----------------------------------------------------------

    #[tokio::test]
    async fn routes_by_provider_variant() {
        let openrouter = MockProvider::new(Provider::OpenRouter);
        let groq = MockProvider::new(Provider::Groq);
        let router = ProviderRouter::new()
            .with_provider(openrouter.clone())
            .with_provider(groq.clone());

        let a = router
            .dispatch(&ProviderModelRef::parse("vendor/a:free").unwrap(), &[], params())
            .await;
        let b = router
            .dispatch(
                &ProviderModelRef::parse("groq:llama-3.3-70b-versatile").unwrap(),
                &[],
                params(),
            )
            .await;

        assert_eq!(a, "openrouter says hi");
        assert_eq!(b, "groq says hi");
        assert_eq!(*openrouter.calls.lock().unwrap(), vec!["vendor/a:free"]);
        assert_eq!(*groq.calls.lock().unwrap(), vec!["llama-3.3-70b-versatile"]);
    }

    #[tokio::test]
    async fn unknown_provider_returns_inline_marker() {
        let router = ProviderRouter::new().with_provider(MockProvider::new(Provider::OpenRouter));
        let text = router
            .dispatch(&ProviderModelRef::parse("foo:bar").unwrap(), &[], params())
            .await;
        assert_eq!(text, "[Error: Unknown provider 'foo']");
    }

    #[tokio::test]
    async fn missing_credential_returns_not_configured_marker() {
        let router = ProviderRouter::from_settings([
            ProviderSettings::defaults_for(Provider::OpenRouter).with_api_key("sk-test"),
            ProviderSettings::defaults_for(Provider::Groq),
        ]);

        assert!(router.is_configured(&Provider::OpenRouter));
        assert!(!router.is_configured(&Provider::Groq));

        let text = router
            .dispatch(&ProviderModelRef::groq("llama").unwrap(), &[], params())
            .await;
        assert_eq!(text, "[Error: GROQ is not configured]");
    }

    #[tokio::test]
    async fn provider_absent_from_router_is_not_configured() {
        let router = ProviderRouter::new();
        let text = router
            .dispatch(&ProviderModelRef::openrouter("a/b").unwrap(), &[], params())
            .await;
        assert_eq!(text, "[Error: OPENROUTER is not configured]");
    }

    #[tokio::test]
    async fn close_reaches_ready_clients_only() {
        let openrouter = MockProvider::new(Provider::OpenRouter);
        let router = ProviderRouter::new()
            .with_provider(openrouter.clone())
            .with_unconfigured(Provider::Groq);

        router.close().await;
        router.close().await;
        assert_eq!(openrouter.closes.load(Ordering::SeqCst), 2);
        assert_eq!(router.configured_providers(), vec![Provider::OpenRouter]);
    }

    // -- End-to-end through the HTTP client -------------------------------------

    fn completion(text: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    #[tokio::test]
    async fn deliberation_survives_member_that_always_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "slow/model"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("too late"))
                    .set_delay(Duration::from_millis(500)),
            )
            // two attempts in Stage 1, two more as a reviewer
            .expect(4)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "fast/model"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("Ownership moves values.")),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "chair/model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "## Consensus Verdict\nOwnership moves values.",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let settings = ProviderSettings::defaults_for(Provider::OpenRouter)
            .with_api_key("sk-test")
            .with_base_url(server.uri())
            .with_retry(RetryPolicy {
                max_retries: 2,
                backoff_base: 0.0,
                jitter: 0.0,
                min_delay: 0.01,
            })
            .with_timeouts(ClientTimeouts {
                connect: Duration::from_secs(1),
                read: Duration::from_millis(100),
            });
        let router = Arc::new(ProviderRouter::from_settings([settings]));
        let use_case = RunDeliberationUseCase::new(Arc::clone(&router));

        let request = DeliberationRequest::new("What is ownership?")
            .with_council(vec![
                ProviderModelRef::parse("fast/model").unwrap(),
                ProviderModelRef::parse("slow/model").unwrap(),
            ])
            .with_chairman(ProviderModelRef::parse("chair/model").unwrap());
        let trace = use_case.execute(request).await;
        router.close().await;

        assert_eq!(trace.opinions.len(), 2);
        assert!(trace.opinions[0].succeeded);
        assert_eq!(trace.opinions[0].text, "Ownership moves values.");
        assert!(!trace.opinions[1].succeeded);
        assert_eq!(
            trace.opinions[1].text,
            "[slow/model failed to respond after 2 retries]"
        );

        assert!(!trace.meta.review_skipped);
        assert_eq!(trace.reviews.len(), 2);
        assert!(!trace.reviews[1].succeeded);

        assert_eq!(trace.verdict, "## Consensus Verdict\nOwnership moves values.");
        assert_eq!(trace.meta.council_size, 2);
        assert_eq!(trace.meta.succeeded_opinions, 1);
    }

    #[tokio::test]
    async fn close_on_unopened_clients_is_harmless() {
        let router = ProviderRouter::from_settings([
            ProviderSettings::defaults_for(Provider::OpenRouter).with_api_key("sk-test"),
        ]);
        router.close().await;
        router.close().await;
    }
}
