//! PostgreSQL-backed stage log sink.

use crate::{DatabaseResult, NewStoryLogRow, PgPool, StoryLogRow, schema::story_logs};
use async_trait::async_trait;
use diesel::prelude::*;
use prism_core::StageLog;
use prism_error::{DatabaseError, DatabaseErrorKind, PrismResult};
use prism_interface::LogSink;
use tracing::{debug, instrument};

/// Stage log sink writing one `story_logs` row per model call.
///
/// Diesel is synchronous, so every operation runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct PostgresLogSink {
    pool: PgPool,
}

impl PostgresLogSink {
    /// Create a sink over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one row.
    #[instrument(skip(self, row), fields(story_id = %row.story_id, log_type = %row.log_type))]
    pub async fn insert(&self, row: NewStoryLogRow) -> DatabaseResult<()> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> DatabaseResult<()> {
            let mut conn = pool.get()?;
            diesel::insert_into(story_logs::table)
                .values(&row)
                .execute(&mut conn)?;
            debug!("Stage log stored");
            Ok(())
        })
        .await
        .map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Query(format!("Task join error: {}", e)))
        })?
    }

    /// Newest rows for a story, most recent first.
    #[instrument(skip(self))]
    pub async fn recent(&self, story_id: &str, limit: i64) -> DatabaseResult<Vec<StoryLogRow>> {
        let pool = self.pool.clone();
        let story = story_id.to_string();

        tokio::task::spawn_blocking(move || -> DatabaseResult<Vec<StoryLogRow>> {
            let mut conn = pool.get()?;
            let rows = story_logs::table
                .filter(story_logs::story_id.eq(&story))
                .order((story_logs::timestamp.desc(), story_logs::id.desc()))
                .limit(limit)
                .select(StoryLogRow::as_select())
                .load(&mut conn)?;
            debug!(count = rows.len(), "Loaded stage logs");
            Ok(rows)
        })
        .await
        .map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Query(format!("Task join error: {}", e)))
        })?
    }
}

#[async_trait]
impl LogSink for PostgresLogSink {
    async fn record(&self, log: &StageLog) -> PrismResult<()> {
        self.insert(NewStoryLogRow::from(log)).await?;
        Ok(())
    }
}
