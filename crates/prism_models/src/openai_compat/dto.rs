//! Chat-completions data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use prism_core::{GenerateRequest, GenerateResponse, TokenUsage};
use serde::{Deserialize, Serialize};

/// Message in the wire format (`role` is lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// Message role
    role: String,
    /// Message content
    content: String,
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatCompletionRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    /// Creates a new builder for `ChatCompletionRequest`.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }

    /// Converts a generic request, falling back to `default_model`.
    pub fn from_generate(req: &GenerateRequest, default_model: &str) -> Self {
        Self {
            model: req
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            messages: req
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_wire().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        }
    }
}

/// Assistant message inside a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Message role
    #[serde(default)]
    pub role: Option<String>,
    /// Generated text; some providers send null for empty output
    #[serde(default)]
    pub content: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Choice {
    /// Choice index
    #[serde(default)]
    index: u32,
    /// Generated message
    message: ChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Token usage block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDto {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Chat-completions response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    /// Completion choices
    #[serde(default)]
    choices: Vec<Choice>,
    /// Token usage
    #[serde(default)]
    usage: Option<UsageDto>,
}

impl ChatCompletionResponse {
    /// Converts the first choice into a generic response.
    ///
    /// Returns `None` when the provider sent no choices.
    pub fn into_generate(self) -> Option<GenerateResponse> {
        let usage = self.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        self.choices.into_iter().next().map(|choice| GenerateResponse {
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Message;

    #[test]
    fn test_request_uses_lowercase_roles_and_skips_unset_options() {
        let req = GenerateRequest::builder()
            .messages(vec![Message::system("sys"), Message::user("hi")])
            .build()
            .unwrap();
        let body = ChatCompletionRequest::from_generate(&req, "glm-4-air");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "glm-4-air");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_model_override() {
        let req = GenerateRequest::builder()
            .model(Some("glm-4-plus".to_string()))
            .temperature(Some(0.9))
            .build()
            .unwrap();
        let body = ChatCompletionRequest::from_generate(&req, "glm-4-air");
        assert_eq!(body.model(), "glm-4-plus");
        assert_eq!(*body.temperature(), Some(0.9));
    }

    #[test]
    fn test_null_content_becomes_empty_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        let generated = response.into_generate().unwrap();
        assert_eq!(generated.text, "");
        assert_eq!(generated.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_no_choices_yields_none() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(response.into_generate().is_none());
    }
}
