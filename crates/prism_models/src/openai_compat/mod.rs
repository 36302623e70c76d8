//! OpenAI-compatible chat-completions client.

mod client;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice};
