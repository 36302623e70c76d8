//! Shared test utilities for pipeline tests.

#![allow(dead_code)]

pub mod failing_sink;
pub mod mock_driver;

pub use failing_sink::FailingLogSink;
pub use mock_driver::{ScriptedDriver, StoryScript};
