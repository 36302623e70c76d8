//! Chat-completion provider integrations for Prism.
//!
//! Every supported provider speaks the OpenAI chat-completions wire format,
//! so a single [`OpenAICompatibleClient`] carries the HTTP, retry and rate
//! limiting concerns. Provider drivers such as [`ZhipuDriver`] only supply
//! endpoints, default models and credentials.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai_compat;
mod rate_limit;
mod retry;
mod zhipu;

pub use openai_compat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, OpenAICompatibleClient,
};
pub use rate_limit::RequestLimiter;
pub use retry::RetryPolicy;
pub use zhipu::{DEFAULT_ZHIPU_MODEL, ZHIPU_API_KEY_ENV, ZHIPU_ENDPOINT, ZhipuDriver};
