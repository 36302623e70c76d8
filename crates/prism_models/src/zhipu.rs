//! Zhipu GLM driver using the OpenAI-compatible client.

use crate::{OpenAICompatibleClient, RetryPolicy};
use async_trait::async_trait;
use prism_core::{GenerateRequest, GenerateResponse};
use prism_error::{ModelsError, ModelsErrorKind, ModelsResult, PrismResult};
use prism_interface::PrismDriver;
use tracing::instrument;

/// Zhipu chat-completions endpoint.
pub const ZHIPU_ENDPOINT: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_ZHIPU_MODEL: &str = "glm-4-air";

/// Environment variable holding the API key.
pub const ZHIPU_API_KEY_ENV: &str = "ZHIPUAI_API_KEY";

/// Zhipu GLM driver.
#[derive(Debug, Clone)]
pub struct ZhipuDriver {
    inner: OpenAICompatibleClient,
}

impl ZhipuDriver {
    /// Creates a driver reading the key from `ZHIPUAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is not set or empty.
    pub fn new(model: impl Into<String>) -> ModelsResult<Self> {
        Self::from_env(ZHIPU_API_KEY_ENV, model)
    }

    /// Creates a driver reading the key from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is not set or empty.
    #[instrument(skip(model))]
    pub fn from_env(api_key_env: &str, model: impl Into<String>) -> ModelsResult<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ModelsError::new(ModelsErrorKind::MissingApiKey(api_key_env.to_string()))
            })?;

        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a driver with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, model, ZHIPU_ENDPOINT)
    }

    /// Creates a driver against a non-default endpoint (proxies, tests).
    pub fn with_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let inner = OpenAICompatibleClient::new(
            api_key.into(),
            model.into(),
            endpoint.into(),
            "zhipu",
        );
        Self { inner }
    }

    /// Enforces a requests-per-minute quota (zero means unlimited).
    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.inner = self.inner.with_rate_limit(requests_per_minute);
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry(retry);
        self
    }

    /// Sets a per-request timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.inner = self.inner.with_timeout(secs);
        self
    }

    /// The underlying compatible client.
    pub fn client(&self) -> &OpenAICompatibleClient {
        &self.inner
    }
}

#[async_trait]
impl PrismDriver for ZhipuDriver {
    #[instrument(skip(self, req), fields(provider = "zhipu", model = %self.inner.model_name()))]
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        self.inner.generate(req).await.map_err(Into::into)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_reported_by_name() {
        let err = ZhipuDriver::from_env("PRISM_TEST_KEY_THAT_IS_NEVER_SET", DEFAULT_ZHIPU_MODEL)
            .unwrap_err();
        assert_eq!(
            err.kind,
            ModelsErrorKind::MissingApiKey("PRISM_TEST_KEY_THAT_IS_NEVER_SET".to_string())
        );
    }

    #[test]
    fn test_defaults() {
        let driver = ZhipuDriver::with_api_key("key", DEFAULT_ZHIPU_MODEL);
        assert_eq!(driver.model_name(), "glm-4-air");
        assert_eq!(driver.provider_name(), "zhipu");
        assert_eq!(driver.client().endpoint(), ZHIPU_ENDPOINT);
    }
}
