//! Log sink that rejects every record.

use async_trait::async_trait;
use prism_core::StageLog;
use prism_error::{BackendError, PrismResult};
use prism_interface::LogSink;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sink whose `record` always fails, counting the attempts.
#[derive(Debug, Default)]
pub struct FailingLogSink {
    attempts: AtomicUsize,
}

impl FailingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `record` calls received.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogSink for FailingLogSink {
    async fn record(&self, log: &StageLog) -> PrismResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::new(format!("story_logs unavailable for {}", log.log_type())).into())
    }
}
