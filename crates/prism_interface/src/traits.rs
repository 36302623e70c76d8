//! Trait definitions for LLM backends and log sinks.

use async_trait::async_trait;
use prism_core::{GenerateRequest, GenerateResponse, StageLog};
use prism_error::PrismResult;
use std::sync::Arc;

/// Core trait that all chat-completion backends must implement.
#[async_trait]
pub trait PrismDriver: Send + Sync {
    /// Generate model output for a chat request.
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse>;

    /// Provider name (e.g., "zhipu", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "glm-4-air").
    fn model_name(&self) -> &str;
}

/// Destination for stage call logs.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Persist one stage log.
    async fn record(&self, log: &StageLog) -> PrismResult<()>;
}

#[async_trait]
impl<T: PrismDriver + ?Sized> PrismDriver for Arc<T> {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: PrismDriver + ?Sized> PrismDriver for Box<T> {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    async fn record(&self, log: &StageLog) -> PrismResult<()> {
        (**self).record(log).await
    }
}

#[async_trait]
impl<T: LogSink + ?Sized> LogSink for Box<T> {
    async fn record(&self, log: &StageLog) -> PrismResult<()> {
        (**self).record(log).await
    }
}
