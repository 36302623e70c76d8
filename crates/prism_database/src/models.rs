//! Diesel models for the story_logs table.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use prism_core::StageLog;

/// Database row for story_logs table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::story_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryLogRow {
    /// Serial id
    pub id: i32,
    /// Story the call belongs to
    pub story_id: String,
    /// Prompt and context sent to the model
    pub request_message: String,
    /// Model output
    pub response_message: String,
    /// Local time of the call
    pub timestamp: NaiveDateTime,
    /// Stage tag (stored in the `type` column)
    pub log_type: String,
}

/// Insertable struct for story_logs table.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::story_logs)]
pub struct NewStoryLogRow {
    /// Story the call belongs to
    pub story_id: String,
    /// Prompt and context sent to the model
    pub request_message: String,
    /// Model output
    pub response_message: String,
    /// Local time of the call
    pub timestamp: NaiveDateTime,
    /// Stage tag (stored in the `type` column)
    pub log_type: String,
}

impl From<&StageLog> for NewStoryLogRow {
    fn from(log: &StageLog) -> Self {
        Self {
            story_id: log.story_id().clone(),
            request_message: log.request_message().clone(),
            response_message: log.response_message().clone(),
            timestamp: *log.timestamp(),
            log_type: log.log_type().clone(),
        }
    }
}

impl TryFrom<StoryLogRow> for StageLog {
    type Error = prism_error::BuilderError;

    fn try_from(row: StoryLogRow) -> Result<Self, Self::Error> {
        StageLog::builder()
            .story_id(row.story_id)
            .request_message(row.request_message)
            .response_message(row.response_message)
            .timestamp(row.timestamp)
            .log_type(row.log_type)
            .build()
            .map_err(|e| prism_error::BuilderError::from(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_log_maps_to_insertable_row() {
        let log = StageLog::now("ex_7", "Describe.\nOriginal Task: t", "A coast.", "prism_devise_setting");
        let row = NewStoryLogRow::from(&log);

        assert_eq!(row.story_id, "ex_7");
        assert_eq!(row.request_message, "Describe.\nOriginal Task: t");
        assert_eq!(row.log_type, "prism_devise_setting");
        assert_eq!(row.timestamp, *log.timestamp());
    }

    #[test]
    fn test_row_maps_back_to_stage_log() {
        let timestamp = chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        let row = StoryLogRow {
            id: 1,
            story_id: "ex_7".to_string(),
            request_message: "req".to_string(),
            response_message: "resp".to_string(),
            timestamp,
            log_type: "prism_write_synthesis".to_string(),
        };

        let log = StageLog::try_from(row).unwrap();
        assert_eq!(log.log_type(), "prism_write_synthesis");
        assert_eq!(*log.timestamp(), timestamp);
    }
}
