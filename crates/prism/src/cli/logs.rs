//! Stage log inspection.

use super::OutputFormat;
use prism::{
    JsonError, PrismConfig, PrismResult, StageLog, connect_log_store, process_env,
    resolve_story_id,
};
use std::path::Path;

/// Handle `prism logs`.
pub async fn logs_command(
    config_path: Option<&Path>,
    story_id: Option<String>,
    limit: i64,
    format: OutputFormat,
) -> PrismResult<()> {
    let config = PrismConfig::load(config_path)?;
    let story_id = resolve_story_id(story_id, process_env);
    let store = connect_log_store(&config.database).await?;

    let rows = store.recent(&story_id, limit).await?;
    let logs = rows
        .into_iter()
        .map(StageLog::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&logs)
                .map_err(|e| JsonError::new(format!("Failed to serialize logs: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            if logs.is_empty() {
                println!("No stage logs for story '{}'", story_id);
            }
            for log in &logs {
                println!(
                    "{}  {:<48} {:>7} chars",
                    log.timestamp().format("%Y-%m-%d %H:%M:%S"),
                    log.log_type(),
                    log.response_message().chars().count()
                );
            }
        }
    }
    Ok(())
}
