//! Core data types for the Prism story pipeline.
//!
//! This crate provides the vocabulary shared by every Prism crate: chat
//! messages and generation requests, the story plan and story draft
//! mappings, the critique vocabulary used by the calibration loop and the
//! per-stage log record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod critique;
mod log;
mod message;
mod plan;
mod request;
mod role;
mod story;

pub use critique::{FocalCategory, Grade, GradeTally, SpectrumDimension};
pub use log::{StageLog, StageLogBuilder};
pub use message::{Message, MessageBuilder};
pub use plan::{PlanSection, StoryPlan};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, TokenUsage};
pub use role::Role;
pub use story::{FULL_STORY_KEY, StoryDraft, StorySection};
