//! Stage log records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One model call made by a pipeline stage.
///
/// # Examples
///
/// ```
/// use prism_core::StageLog;
///
/// let log = StageLog::now("story-1", "request", "response", "prism_devise_conflict");
/// assert_eq!(log.story_id(), "story-1");
/// assert_eq!(log.log_type(), "prism_devise_conflict");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StageLog {
    /// Story the call belongs to
    story_id: String,
    /// Prompt and context sent to the model
    request_message: String,
    /// Model output (or the absorbed error text)
    response_message: String,
    /// Local time of the call
    timestamp: NaiveDateTime,
    /// Stage tag, e.g. `prism_weave_Climax`
    log_type: String,
}

impl StageLog {
    /// Creates a new stage log builder.
    pub fn builder() -> StageLogBuilder {
        StageLogBuilder::default()
    }

    /// Creates a log stamped with the current local time.
    pub fn now(
        story_id: impl Into<String>,
        request_message: impl Into<String>,
        response_message: impl Into<String>,
        log_type: impl Into<String>,
    ) -> Self {
        Self {
            story_id: story_id.into(),
            request_message: request_message.into(),
            response_message: response_message.into(),
            timestamp: chrono::Local::now().naive_local(),
            log_type: log_type.into(),
        }
    }
}
