//! Trait definitions for the Prism story pipeline.
//!
//! The pipeline talks to two collaborators: a chat-completion backend
//! ([`PrismDriver`]) and a sink for per-stage call logs ([`LogSink`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod traits;

pub use memory::MemoryLogSink;
pub use traits::{LogSink, PrismDriver};
