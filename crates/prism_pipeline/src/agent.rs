//! Single-call stage agent.

use crate::DEFAULT_SYSTEM_PROMPT;
use prism_core::{GenerateRequest, Message, StageLog};
use prism_interface::{LogSink, PrismDriver};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Prefix of the text substituted for a failed model call.
pub const LLM_ERROR_PREFIX: &str = "[ERROR] LLM call failed: ";

/// Sends one stage prompt to the model and records the exchange.
///
/// A failed model call never aborts the pipeline: the error text becomes
/// the stage output so that downstream parsing falls back gracefully.
#[derive(Clone)]
pub struct StageAgent {
    driver: Arc<dyn PrismDriver>,
    sink: Option<Arc<dyn LogSink>>,
    system_prompt: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for StageAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageAgent")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.driver.model_name())
            .field("sink", &self.sink.is_some())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl StageAgent {
    /// Create an agent with the default system prompt and no log sink.
    pub fn new(driver: Arc<dyn PrismDriver>) -> Self {
        Self {
            driver,
            sink: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Record every call in `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set the sampling temperature sent with each request.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token cap sent with each request.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The system prompt in use.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run one stage.
    ///
    /// The request text is `prompt + "\n" + context`. Returns the model
    /// output, or `"[ERROR] LLM call failed: <error>"` if the call failed.
    #[instrument(skip(self, prompt, context), fields(provider = self.driver.provider_name()))]
    pub async fn call(&self, prompt: &str, context: &str, story_id: &str, log_type: &str) -> String {
        let request_text = format!("{}\n{}", prompt, context);
        let request = GenerateRequest {
            messages: vec![
                Message::system(self.system_prompt.as_str()),
                Message::user(request_text.as_str()),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            model: None,
        };

        debug!(request = %request_text, "Sending stage request");

        let output = match self.driver.generate(&request).await {
            Ok(response) => response.text,
            Err(e) => {
                error!(error = %e, "Stage model call failed");
                format!("{}{}", LLM_ERROR_PREFIX, e)
            }
        };

        info!(
            request_chars = request_text.len(),
            response_chars = output.len(),
            "Stage complete"
        );
        debug!(response = %output, "Stage response");

        if let Some(sink) = &self.sink {
            let log = StageLog::now(story_id, request_text, output.as_str(), log_type);
            if let Err(e) = sink.record(&log).await {
                warn!(error = %e, "Failed to save stage log");
            }
        }

        output
    }
}
