//! Driver and agent construction from configuration.

use crate::ModelConfig;
use prism_error::{ConfigError, ModelsError, ModelsErrorKind, PrismResult};
use prism_interface::{LogSink, PrismDriver};
use prism_models::{OpenAICompatibleClient, RetryPolicy, ZHIPU_ENDPOINT, ZhipuDriver};
use prism_pipeline::StageAgent;
use std::sync::Arc;
use tracing::{info, instrument};

/// Default endpoint for `provider = "openai"`.
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

fn api_key(var: &str) -> PrismResult<String> {
    let key = std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ModelsError::new(ModelsErrorKind::MissingApiKey(var.to_string())))?;
    Ok(key)
}

/// Build the chat driver named by `model.provider`.
///
/// `zhipu` and `openai` have default endpoints; any other provider is
/// treated as OpenAI-compatible and needs `model.endpoint`.
///
/// # Errors
///
/// Returns `MissingApiKey` if the key variable is unset, or a configuration
/// error for an unknown provider without an endpoint.
#[instrument(skip(model, retry), fields(provider = %model.provider, model = %model.name))]
pub fn build_driver(model: &ModelConfig, retry: RetryPolicy) -> PrismResult<Arc<dyn PrismDriver>> {
    let key = api_key(&model.api_key_env)?;

    let driver: Arc<dyn PrismDriver> = match model.provider.as_str() {
        "zhipu" => {
            let endpoint = model.endpoint.as_deref().unwrap_or(ZHIPU_ENDPOINT);
            let mut driver =
                ZhipuDriver::with_endpoint(key, model.name.as_str(), endpoint).with_retry(retry);
            if model.requests_per_minute > 0 {
                driver = driver.with_rate_limit(model.requests_per_minute);
            }
            if let Some(secs) = model.timeout_secs {
                driver = driver.with_timeout(secs);
            }
            Arc::new(driver)
        }
        "openai" => {
            let endpoint = model.endpoint.as_deref().unwrap_or(OPENAI_ENDPOINT);
            let client =
                OpenAICompatibleClient::new(key, model.name.clone(), endpoint.to_string(), "openai");
            Arc::new(tune(client, model, retry))
        }
        other => {
            let endpoint = model.endpoint.clone().ok_or_else(|| {
                ConfigError::new(format!(
                    "model.endpoint is required for provider '{}'",
                    other
                ))
            })?;
            let client =
                OpenAICompatibleClient::new(key, model.name.clone(), endpoint, "openai-compatible");
            Arc::new(tune(client, model, retry))
        }
    };

    info!(provider = driver.provider_name(), "Chat driver ready");
    Ok(driver)
}

fn tune(
    mut client: OpenAICompatibleClient,
    model: &ModelConfig,
    retry: RetryPolicy,
) -> OpenAICompatibleClient {
    client = client.with_retry(retry);
    if model.requests_per_minute > 0 {
        client = client.with_rate_limit(model.requests_per_minute);
    }
    if let Some(secs) = model.timeout_secs {
        client = client.with_timeout(secs);
    }
    client
}

/// Wrap `driver` in a stage agent configured from `model`.
pub fn build_agent(
    driver: Arc<dyn PrismDriver>,
    model: &ModelConfig,
    sink: Option<Arc<dyn LogSink>>,
) -> StageAgent {
    let mut agent = StageAgent::new(driver)
        .with_temperature(model.temperature)
        .with_max_tokens(model.max_tokens);
    if let Some(prompt) = &model.system_prompt {
        agent = agent.with_system_prompt(prompt.as_str());
    }
    if let Some(sink) = sink {
        agent = agent.with_sink(sink);
    }
    agent
}

/// Connect to PostgreSQL and apply pending migrations.
///
/// # Errors
///
/// Returns an error if the URL variable is unset, the pool cannot be built
/// or a migration fails.
#[cfg(feature = "database")]
#[instrument(skip(database), fields(url_env = %database.url_env))]
pub async fn connect_log_store(
    database: &crate::DatabaseConfig,
) -> PrismResult<Arc<prism_database::PostgresLogSink>> {
    let url = prism_database::database_url_from_env(&database.url_env)?;
    let pool_size = database.pool_size;

    let pool = tokio::task::spawn_blocking(move || -> PrismResult<prism_database::PgPool> {
        let pool = prism_database::create_pool(&url, pool_size)?;
        let mut conn = pool.get().map_err(prism_error::DatabaseError::from)?;
        prism_database::run_migrations(&mut conn)?;
        Ok(pool)
    })
    .await
    .map_err(|e| ConfigError::new(format!("Database setup task failed: {}", e)))??;

    info!(pool_size, "Stage logs will be stored in PostgreSQL");
    Ok(Arc::new(prism_database::PostgresLogSink::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_error::PrismErrorKind;

    #[test]
    fn test_missing_key_is_reported() {
        let model = ModelConfig {
            api_key_env: "PRISM_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..ModelConfig::default()
        };
        let Err(err) = build_driver(&model, RetryPolicy::disabled()) else {
            panic!("expected missing key error");
        };
        match err.kind() {
            PrismErrorKind::Models(e) => assert_eq!(
                e.kind,
                ModelsErrorKind::MissingApiKey("PRISM_TEST_KEY_THAT_IS_NEVER_SET".to_string())
            ),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_provider_needs_endpoint() {
        let model = ModelConfig {
            provider: "local".to_string(),
            api_key_env: "PATH".to_string(),
            ..ModelConfig::default()
        };
        let Err(err) = build_driver(&model, RetryPolicy::disabled()) else {
            panic!("expected configuration error");
        };
        assert!(matches!(err.kind(), PrismErrorKind::Config(_)));
    }

    #[test]
    fn test_agent_uses_configured_system_prompt() {
        let driver: Arc<dyn PrismDriver> = Arc::new(OpenAICompatibleClient::new(
            "key".to_string(),
            "glm-4-air".to_string(),
            ZHIPU_ENDPOINT.to_string(),
            "zhipu",
        ));
        let model = ModelConfig {
            system_prompt: Some("Write tersely.".to_string()),
            ..ModelConfig::default()
        };

        let agent = build_agent(driver, &model, None);
        assert_eq!(agent.system_prompt(), "Write tersely.");
    }
}
