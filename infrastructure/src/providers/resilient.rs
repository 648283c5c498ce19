//! Resilient chat-completion client for one OpenAI-compatible provider.
//!
//! `chat` never fails: every attempt returns a [`CallError`] or text, the
//! retry loop classifies errors with [`CallError::is_retryable`], and the
//! caller gets either the assistant text or a fallback marker.

use super::ChatProvider;
use super::error::CallError;
use super::settings::ProviderSettings;
use async_trait::async_trait;
use council_domain::{ChatMessage, FallbackMarker, Provider, SamplingParams};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Longest upstream error body kept in a [`CallError::Status`]
const MAX_ERROR_BODY: usize = 200;

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Extract `choices[0].message.content`; any other shape is a payload error.
fn parse_completion(body: &str) -> Result<String, CallError> {
    let parsed: ChatApiResponse =
        serde_json::from_str(body).map_err(|e| CallError::Payload(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| CallError::Payload("no choices in response".to_string()))
}

// =============================================================================
// CLIENT
// =============================================================================

/// One provider's client: a lazily created connection pool plus retry policy
pub struct ResilientProviderClient {
    settings: ProviderSettings,
    api_key: String,
    pool: Mutex<Option<reqwest::Client>>,
}

impl ResilientProviderClient {
    pub fn new(settings: ProviderSettings, api_key: impl Into<String>) -> Self {
        Self {
            settings,
            api_key: api_key.into(),
            pool: Mutex::new(None),
        }
    }

    /// Whether a connection pool is currently open
    pub fn is_open(&self) -> bool {
        self.lock_pool().is_some()
    }

    fn lock_pool(&self) -> MutexGuard<'_, Option<reqwest::Client>> {
        self.pool
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Shared pool, created on first use and after `close`
    fn pool(&self) -> Result<reqwest::Client, CallError> {
        let mut guard = self.lock_pool();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .connect_timeout(self.settings.timeouts.connect)
            .read_timeout(self.settings.timeouts.read)
            .default_headers(self.default_headers()?)
            .build()
            .map_err(|e| CallError::Unexpected(format!("failed to build HTTP client: {e}")))?;
        debug!(provider = %self.settings.provider, "Opened connection pool");
        *guard = Some(client.clone());
        Ok(client)
    }

    fn default_headers(&self) -> Result<HeaderMap, CallError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| CallError::Unexpected("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        if let Some(referer) = &self.settings.referer
            && let Ok(value) = HeaderValue::from_str(referer)
        {
            headers.insert("HTTP-Referer", value);
        }
        if let Some(title) = &self.settings.app_title
            && let Ok(value) = HeaderValue::from_str(title)
        {
            headers.insert("X-Title", value);
        }

        Ok(headers)
    }

    /// One HTTP attempt, no retry
    async fn attempt(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: SamplingParams,
    ) -> Result<String, CallError> {
        let client = self.pool()?;
        let request = ChatApiRequest {
            model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = client
            .post(self.settings.chat_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CallError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Status {
                code: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await?;
        parse_completion(&body)
    }
}

#[async_trait]
impl ChatProvider for ResilientProviderClient {
    fn provider(&self) -> Provider {
        self.settings.provider.clone()
    }

    async fn chat(&self, model: &str, messages: &[ChatMessage], params: SamplingParams) -> String {
        let retry = self.settings.retry;
        let attempts = retry.attempts();
        let mut last_error: Option<CallError> = None;

        for attempt in 1..=attempts {
            debug!(model, attempt, attempts, "Requesting completion");

            match self.attempt(model, messages, params).await {
                Ok(text) => {
                    debug!(model, attempt, "Completion received");
                    return text;
                }
                Err(e) if e.is_retryable() => {
                    warn!(model, attempt, kind = e.code(), "Transient provider failure: {}", e);
                    last_error = Some(e);
                }
                Err(e) => {
                    warn!(model, attempt, kind = e.code(), "Terminal provider failure, not retrying: {}", e);
                    last_error = Some(e);
                    break;
                }
            }

            if let Some(delay) = retry.delay_after(attempt) {
                info!(model, "Backing off {:.2}s before attempt {}", delay.as_secs_f64(), attempt + 1);
                tokio::time::sleep(delay).await;
            }
        }

        error!(
            model,
            attempts,
            last_error = ?last_error,
            "Provider call failed, returning fallback"
        );
        FallbackMarker::retries_exhausted(model, attempts)
    }

    async fn close(&self) {
        if self.lock_pool().take().is_some() {
            debug!(provider = %self.settings.provider, "Closed connection pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::retry::RetryPolicy;
    use crate::providers::settings::ClientTimeouts;
    use council_domain::is_fallback;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "vendor/model:free";

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_base: 0.0,
            jitter: 0.0,
            min_delay: 0.01,
        }
    }

    fn client(server: &MockServer, max_retries: u32) -> ResilientProviderClient {
        let settings = ProviderSettings::defaults_for(Provider::OpenRouter)
            .with_base_url(server.uri())
            .with_retry(fast_retry(max_retries));
        ResilientProviderClient::new(settings, "test-key")
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("Be brief."), ChatMessage::user("Hi")]
    }

    fn completion(text: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    #[test]
    fn parse_completion_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"one"}},{"message":{"content":"two"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "one");
    }

    #[test]
    fn parse_completion_rejects_other_shapes() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"error":{"message":"quota"}}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_completion(body), Err(CallError::Payload(_))),
                "accepted {body}"
            );
        }
    }

    #[tokio::test]
    async fn returns_assistant_text_and_sends_openai_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("x-title", "llm-council"))
            .and(body_partial_json(json!({
                "model": MODEL,
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Hi"}
                ],
                "max_tokens": 256
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, 1)
            .chat(MODEL, &messages(), SamplingParams::new(0.5, 256))
            .await;
        assert_eq!(text, "Hello!");
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let text = client(&server, 3)
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert_eq!(text, "[vendor/model:free failed to respond after 3 retries]");
        assert!(is_fallback(&text));
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("after wait")))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, 2)
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert_eq!(text, "after wait");
    }

    #[tokio::test]
    async fn client_errors_abort_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, 3)
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert!(is_fallback(&text));
        assert!(text.contains(MODEL));
    }

    #[tokio::test]
    async fn malformed_payload_aborts_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, 3)
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert!(is_fallback(&text));
    }

    #[tokio::test]
    async fn read_timeout_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("too late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let settings = ProviderSettings::defaults_for(Provider::Groq)
            .with_base_url(server.uri())
            .with_retry(fast_retry(2))
            .with_timeouts(ClientTimeouts {
                connect: Duration::from_secs(1),
                read: Duration::from_millis(100),
            });
        let client = ResilientProviderClient::new(settings, "test-key");

        let text = client
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert_eq!(text, "[vendor/model:free failed to respond after 2 retries]");
    }

    #[tokio::test]
    async fn connection_refused_falls_back() {
        let settings = ProviderSettings::defaults_for(Provider::OpenRouter)
            .with_base_url("http://127.0.0.1:1")
            .with_retry(fast_retry(2));
        let client = ResilientProviderClient::new(settings, "test-key");

        let text = client
            .chat(MODEL, &messages(), SamplingParams::new(0.7, 64))
            .await;
        assert!(is_fallback(&text));
    }

    #[tokio::test]
    async fn pool_is_lazy_and_reopens_after_close() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, 1);
        assert!(!client.is_open());

        assert_eq!(client.chat(MODEL, &messages(), SamplingParams::new(0.7, 64)).await, "ok");
        assert!(client.is_open());

        client.close().await;
        client.close().await;
        assert!(!client.is_open());

        assert_eq!(client.chat(MODEL, &messages(), SamplingParams::new(0.7, 64)).await, "ok");
        assert!(client.is_open());
    }
}
