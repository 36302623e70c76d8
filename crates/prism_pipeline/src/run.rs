//! Whole-stage runs: plan, write, plan-then-write and batch.

use crate::{
    LoadedPlan, PlanArtifact, PlanOutcome, StageAgent, StoryOutcome, WriteArtifact,
    generate_plan, generate_story, load_plan_or_empty, save_plan, save_story,
};
use prism_error::{PipelineError, PipelineErrorKind, PrismResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Default plan artifact file name.
pub const PLAN_FILE_NAME: &str = "story_plan.json";
/// Default story JSON artifact file name.
pub const WRITE_JSON_FILE_NAME: &str = "story_write.json";
/// Default story text artifact file name.
pub const WRITE_TEXT_FILE_NAME: &str = "story_text.txt";
/// Story id used when none is given.
pub const DEFAULT_STORY_ID: &str = "example_unknown";

/// Artifact file names and output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    /// Output directory; the working directory when unset
    pub dir: Option<PathBuf>,
    /// Plan artifact file name
    pub plan_file: String,
    /// Story JSON artifact file name
    pub write_json_file: String,
    /// Story text artifact file name
    pub write_text_file: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            dir: None,
            plan_file: PLAN_FILE_NAME.to_string(),
            write_json_file: WRITE_JSON_FILE_NAME.to_string(),
            write_text_file: WRITE_TEXT_FILE_NAME.to_string(),
        }
    }
}

impl OutputLayout {
    /// Same file names under `dir`.
    pub fn in_dir(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..self.clone()
        }
    }

    fn base(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Path of the plan artifact.
    pub fn plan_path(&self) -> PathBuf {
        self.base().join(&self.plan_file)
    }

    /// Path of the story JSON artifact.
    pub fn write_json_path(&self) -> PathBuf {
        self.base().join(&self.write_json_file)
    }

    /// Path of the story text artifact.
    pub fn write_text_path(&self) -> PathBuf {
        self.base().join(&self.write_text_file)
    }
}

/// Run the plan stage and save `story_plan.json`.
///
/// A failed save is logged; the outcome is still returned.
#[instrument(skip(agent, task, plan_path), fields(plan_path = %plan_path.display()))]
pub async fn run_plan(
    agent: &StageAgent,
    story_id: &str,
    task: &str,
    plan_path: &Path,
) -> (PlanArtifact, PlanOutcome) {
    let outcome = generate_plan(agent, story_id, task).await;
    let artifact = PlanArtifact {
        plan: outcome.plan().clone(),
        example_id: story_id.to_string(),
        task: task.to_string(),
    };
    if let Err(e) = save_plan(plan_path, &artifact) {
        warn!(error = %e, "Cannot write plan");
    }
    (artifact, outcome)
}

/// Run the write stage from a loaded plan and save both story artifacts.
#[instrument(skip(agent, loaded, json_path, text_path), fields(json = %json_path.display(), text = %text_path.display()))]
pub async fn run_write(
    agent: &StageAgent,
    story_id: &str,
    loaded: &LoadedPlan,
    json_path: &Path,
    text_path: &Path,
) -> (WriteArtifact, StoryOutcome) {
    let outcome = generate_story(agent, story_id, &loaded.plan, &loaded.task).await;
    let artifact = WriteArtifact::from_draft(story_id, outcome.draft().clone());
    if let Err(e) = save_story(json_path, text_path, &artifact) {
        warn!(error = %e, "Cannot write story artifacts");
    }
    (artifact, outcome)
}

/// Run the write stage from a plan file.
pub async fn run_write_from_file(
    agent: &StageAgent,
    story_id: &str,
    plan_path: Option<&Path>,
    json_path: &Path,
    text_path: &Path,
) -> (WriteArtifact, StoryOutcome) {
    let loaded = load_plan_or_empty(plan_path);
    run_write(agent, story_id, &loaded, json_path, text_path).await
}

/// Plan then write one story into `layout`.
#[instrument(skip(agent, task, layout))]
pub async fn run_story(
    agent: &StageAgent,
    story_id: &str,
    task: &str,
    layout: &OutputLayout,
) -> (PlanArtifact, WriteArtifact) {
    let (plan_artifact, _) = run_plan(agent, story_id, task, &layout.plan_path()).await;
    let loaded = LoadedPlan {
        plan: plan_artifact.plan.clone(),
        task: plan_artifact.task.clone(),
    };
    let (write_artifact, _) = run_write(
        agent,
        story_id,
        &loaded,
        &layout.write_json_path(),
        &layout.write_text_path(),
    )
    .await;
    (plan_artifact, write_artifact)
}

/// One entry of a batch input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Story identifier, also the output sub-directory name
    pub example_id: String,
    /// Creative writing task
    pub task: String,
}

/// Parse a batch input file: a JSON array of `{example_id, task}`.
pub fn load_batch(path: &Path) -> PrismResult<Vec<BatchItem>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::new(PipelineErrorKind::BatchInput(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    let items = serde_json::from_str(&contents).map_err(|e| {
        PipelineError::new(PipelineErrorKind::BatchInput(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(items)
}

/// Plan and write every batch item into `<layout dir>/<example_id>/`.
///
/// Items run sequentially; returns the story artifacts in input order.
#[instrument(skip(agent, items, layout), fields(count = items.len()))]
pub async fn run_batch(
    agent: &StageAgent,
    items: &[BatchItem],
    layout: &OutputLayout,
) -> Vec<WriteArtifact> {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        info!(index, example_id = %item.example_id, "Starting batch item");
        let item_layout = layout.in_dir(layout.base().join(&item.example_id));
        let (_, write) = run_story(agent, &item.example_id, &item.task, &item_layout).await;
        results.push(write);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_uses_working_directory() {
        let layout = OutputLayout::default();
        assert_eq!(layout.plan_path(), PathBuf::from("./story_plan.json"));
        assert_eq!(layout.write_text_path(), PathBuf::from("./story_text.txt"));
    }

    #[test]
    fn test_in_dir_keeps_file_names() {
        let layout = OutputLayout {
            write_json_file: "out.json".to_string(),
            ..OutputLayout::default()
        }
        .in_dir("runs/ex_1");
        assert_eq!(layout.write_json_path(), PathBuf::from("runs/ex_1/out.json"));
        assert_eq!(layout.plan_path(), PathBuf::from("runs/ex_1/story_plan.json"));
    }
}
