//! HTTP client for OpenAI-compatible chat-completions endpoints.

use super::dto::{ChatCompletionRequest, ChatCompletionResponse};
use crate::{RequestLimiter, RetryPolicy};
use async_trait::async_trait;
use prism_core::{GenerateRequest, GenerateResponse};
use prism_error::{ModelsError, ModelsErrorKind, ModelsResult, PrismResult, RetryableError};
use prism_interface::PrismDriver;
use reqwest::Client;
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, instrument, warn};

/// Client for any provider exposing the chat-completions wire format.
///
/// # Examples
///
/// ```
/// use prism_models::{OpenAICompatibleClient, RetryPolicy};
///
/// let client = OpenAICompatibleClient::new(
///     "sk-test".to_string(),
///     "glm-4-air".to_string(),
///     "https://open.bigmodel.cn/api/paas/v4/chat/completions".to_string(),
///     "zhipu",
/// )
/// .with_rate_limit(30)
/// .with_retry(RetryPolicy::disabled())
/// .with_timeout(120);
///
/// assert_eq!(client.model_name(), "glm-4-air");
/// assert_eq!(client.provider_name(), "zhipu");
/// ```
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    provider: &'static str,
    limiter: Option<RequestLimiter>,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl OpenAICompatibleClient {
    /// Creates a client with default retry policy and no rate limit.
    pub fn new(api_key: String, model: String, endpoint: String, provider: &'static str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint,
            provider,
            limiter: None,
            retry: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Enforces a requests-per-minute quota (zero means unlimited).
    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.limiter = RequestLimiter::per_minute(requests_per_minute);
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets a per-request timeout in seconds (zero disables it).
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Provider name used in logs.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Default model identifier.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Chat-completions endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Active retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Sends a request, retrying transient failures.
    #[instrument(skip(self, req), fields(provider = self.provider, model = %self.model, messages = req.messages.len()))]
    pub async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
        let body = ChatCompletionRequest::from_generate(req, &self.model);

        Retry::spawn(self.retry.delays(), || {
            let body = &body;
            async move {
                match self.send_once(body).await {
                    Ok(response) => Ok(response),
                    Err(e) if e.is_retryable() => {
                        warn!(error = %e, "Chat completion failed, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Permanent chat completion error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await
    }

    /// One attempt: wait for quota, POST, classify the outcome.
    async fn send_once(&self, body: &ChatCompletionRequest) -> ModelsResult<GenerateResponse> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await;
        }

        debug!(endpoint = %self.endpoint, "Sending chat completion request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Chat completion request failed");
            ModelsError::new(ModelsErrorKind::Http(e.to_string()))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelsError::new(ModelsErrorKind::Http(e.to_string())))?;

        if status.as_u16() == 429 {
            return Err(ModelsError::new(ModelsErrorKind::RateLimit));
        }
        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "Chat completion API error");
            return Err(ModelsError::new(ModelsErrorKind::Api {
                status: status.as_u16(),
                message: text,
            }));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ModelsError::new(ModelsErrorKind::ResponseParsing(e.to_string())))?;

        let generated = parsed
            .into_generate()
            .ok_or_else(|| ModelsError::new(ModelsErrorKind::EmptyResponse))?;

        debug!(
            chars = generated.text.len(),
            finish_reason = ?generated.finish_reason,
            total_tokens = generated.usage.map(|u| u.total_tokens),
            "Received chat completion"
        );
        Ok(generated)
    }
}

#[async_trait]
impl PrismDriver for OpenAICompatibleClient {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        OpenAICompatibleClient::generate(self, req)
            .await
            .map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
