//! In-process log sink.

use crate::LogSink;
use async_trait::async_trait;
use prism_core::StageLog;
use prism_error::{BackendError, PrismResult};
use std::sync::Mutex;

/// Log sink that keeps records in memory.
///
/// Used when no database is configured and in tests.
///
/// # Examples
///
/// ```
/// use prism_core::StageLog;
/// use prism_interface::{LogSink, MemoryLogSink};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let sink = MemoryLogSink::new();
///     sink.record(&StageLog::now("s1", "req", "resp", "prism_weave_Climax")).await.unwrap();
///     assert_eq!(sink.log_types(), vec!["prism_weave_Climax".to_string()]);
/// });
/// ```
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    records: Mutex<Vec<StageLog>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded logs in insertion order.
    pub fn records(&self) -> Vec<StageLog> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded log types in insertion order.
    pub fn log_types(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|log| log.log_type().clone())
            .collect()
    }
}

#[async_trait]
impl LogSink for MemoryLogSink {
    async fn record(&self, log: &StageLog) -> PrismResult<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| BackendError::new(format!("Log sink lock poisoned: {}", e)))?;
        guard.push(log.clone());
        tracing::trace!(log_type = %log.log_type(), total = guard.len(), "Recorded stage log");
        Ok(())
    }
}
