use async_trait::async_trait;
use prism_core::{GenerateRequest, GenerateResponse, Message, StageLog};
use prism_error::PrismResult;
use prism_interface::{LogSink, MemoryLogSink, PrismDriver};
use std::sync::Arc;

// Mock driver for testing
struct MockDriver {
    response: String,
}

#[async_trait]
impl PrismDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        let last = req
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(GenerateResponse::text(format!("{}: {}", self.response, last)))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

#[tokio::test]
async fn test_shared_driver_delegates() {
    let driver: Arc<dyn PrismDriver> = Arc::new(MockDriver {
        response: "Echo".to_string(),
    });
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hello")])
        .build()
        .unwrap();

    let response = driver.generate(&request).await.unwrap();
    assert_eq!(response.text, "Echo: hello");
    assert_eq!(driver.provider_name(), "mock");
    assert_eq!(driver.model_name(), "mock-model");
}

#[tokio::test]
async fn test_boxed_driver_delegates() {
    let driver: Box<dyn PrismDriver> = Box::new(MockDriver {
        response: "Boxed".to_string(),
    });
    let request = GenerateRequest::default();
    let response = driver.generate(&request).await.unwrap();
    assert_eq!(response.text, "Boxed: ");
}

#[tokio::test]
async fn test_memory_sink_preserves_order_through_arc() {
    let sink = Arc::new(MemoryLogSink::new());
    let shared: Arc<dyn LogSink> = sink.clone();

    shared
        .record(&StageLog::now("s", "a", "b", "prism_devise_conflict"))
        .await
        .unwrap();
    shared
        .record(&StageLog::now("s", "c", "d", "prism_devise_character"))
        .await
        .unwrap();

    assert_eq!(
        sink.log_types(),
        vec!["prism_devise_conflict", "prism_devise_character"]
    );
    assert_eq!(sink.records()[1].request_message(), "c");
}
