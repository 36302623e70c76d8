//! On-disk plan and story artifacts.

use crate::parse_scratchpad;
use prism_core::{PlanSection, StoryDraft, StoryPlan};
use prism_error::{
    PipelineError, PipelineErrorKind, PrismResult, StorageError, StorageErrorKind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Timestamp format of `generated_at`.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Contents of `story_plan.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanArtifact {
    /// The calibrated plan
    pub plan: StoryPlan,
    /// Story identifier
    pub example_id: String,
    /// Task the plan was devised for
    pub task: String,
}

/// Contents of `story_write.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteArtifact {
    /// Story identifier
    pub example_id: String,
    /// Synthesized story text
    pub full_story: String,
    /// Every section plus the full story
    pub story_dict: StoryDraft,
    /// Local time of generation
    pub generated_at: String,
}

impl WriteArtifact {
    /// Build the artifact for `draft`, stamped with the current local time.
    pub fn from_draft(example_id: impl Into<String>, draft: StoryDraft) -> Self {
        Self {
            example_id: example_id.into(),
            full_story: draft.full_story_text(),
            story_dict: draft,
            generated_at: chrono::Local::now().format(GENERATED_AT_FORMAT).to_string(),
        }
    }
}

/// Plan and task recovered from a plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedPlan {
    /// Plan sections
    pub plan: StoryPlan,
    /// Original task, empty if unknown
    pub task: String,
}

/// Plan key that older plan files used to carry the task inside the plan.
const EMBEDDED_TASK_KEY: &str = "Creative Writing Task";

#[derive(Debug, Deserialize)]
struct PlanFile {
    plan: Option<BTreeMap<String, serde_json::Value>>,
    task: Option<String>,
    scratchpad: Option<String>,
}

/// Collect the plan sections of a raw `plan` object.
///
/// Unknown keys are skipped with a warning. An embedded
/// `Creative Writing Task` entry is returned separately.
fn plan_from_raw(
    path: &Path,
    raw: BTreeMap<String, serde_json::Value>,
) -> (StoryPlan, Option<String>) {
    let mut plan = StoryPlan::new();
    let mut embedded_task = None;
    for (key, value) in raw {
        let text = match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        if let Ok(section) = PlanSection::from_str(&key) {
            plan.set(section, text);
        } else if key.trim().eq_ignore_ascii_case(EMBEDDED_TASK_KEY) {
            embedded_task = Some(text);
        } else {
            warn!(path = %path.display(), key = %key, "Ignoring unknown plan key");
        }
    }
    (plan, embedded_task)
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })
        }
        _ => Ok(()),
    }
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> PrismResult<()> {
    let contents = serde_json::to_string_pretty(value).map_err(|e| {
        PipelineError::new(PipelineErrorKind::Serialization(e.to_string()))
    })?;
    write_text(path, &contents)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_text(path: &Path, text: &str) -> PrismResult<()> {
    ensure_parent(path)?;
    std::fs::write(path, text).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Wrote artifact");
    Ok(())
}

/// Write the plan artifact.
pub fn save_plan(path: &Path, artifact: &PlanArtifact) -> PrismResult<()> {
    write_json(path, artifact)?;
    info!(path = %path.display(), "Plan written");
    Ok(())
}

/// Write the story JSON and text artifacts.
///
/// Both files are attempted; the first failure is returned.
pub fn save_story(json_path: &Path, text_path: &Path, artifact: &WriteArtifact) -> PrismResult<()> {
    let json = write_json(json_path, artifact);
    if json.is_ok() {
        info!(path = %json_path.display(), "Write JSON written");
    }
    let text = write_text(text_path, &artifact.full_story);
    if text.is_ok() {
        info!(path = %text_path.display(), "Story text written");
    }
    json.and(text)
}

/// Read a plan file.
///
/// Accepts `{"plan": {...}, "task": "..."}` or the legacy
/// `{"scratchpad": "[Label] ..."}` form. For the legacy form the task comes
/// from `task` if present, otherwise from the `[Creative Writing Task]`
/// block. In the `plan` form, keys that are not plan sections are skipped,
/// and a `Creative Writing Task` entry supplies the task when `task` is
/// absent.
pub fn load_plan(path: &Path) -> PrismResult<LoadedPlan> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::new(PipelineErrorKind::PlanFileRead(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;
    let file: PlanFile = serde_json::from_str(&contents).map_err(|e| {
        PipelineError::new(PipelineErrorKind::PlanFileInvalid(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    let loaded = match (file.plan, file.scratchpad) {
        (Some(raw), _) => {
            let (plan, embedded_task) = plan_from_raw(path, raw);
            LoadedPlan {
                plan,
                task: file.task.or(embedded_task).unwrap_or_default(),
            }
        }
        (None, Some(scratchpad)) => {
            let (plan, block_task) = parse_scratchpad(&scratchpad);
            LoadedPlan {
                plan,
                task: file.task.or(block_task).unwrap_or_default(),
            }
        }
        (None, None) => {
            return Err(PipelineError::new(PipelineErrorKind::PlanFileInvalid(format!(
                "{}: neither plan nor scratchpad",
                path.display()
            )))
            .into());
        }
    };
    Ok(loaded)
}

/// Read a plan file, falling back to an empty plan and task.
///
/// A missing path, unreadable file or empty plan logs a warning; the
/// write stage then runs without a plan.
pub fn load_plan_or_empty(path: Option<&Path>) -> LoadedPlan {
    let Some(path) = path else {
        warn!("No plan file given, writing without a plan");
        return LoadedPlan::default();
    };
    if !path.exists() {
        warn!(path = %path.display(), "Plan file not found, writing without a plan");
        return LoadedPlan::default();
    }
    match load_plan(path) {
        Ok(loaded) if loaded.plan.is_empty() => {
            warn!(path = %path.display(), "Plan file has an empty plan, writing without a plan");
            LoadedPlan::default()
        }
        Ok(loaded) => loaded,
        Err(e) => {
            warn!(error = %e, "Failed to read plan, writing without a plan");
            LoadedPlan::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{PlanSection, StorySection};

    #[test]
    fn test_write_artifact_takes_full_story() {
        let mut draft = StoryDraft::new();
        draft.set(StorySection::Exposition, "Dawn.");
        draft.set_full_story("The whole tale.");
        let artifact = WriteArtifact::from_draft("ex_1", draft);
        assert_eq!(artifact.full_story, "The whole tale.");
        assert_eq!(artifact.generated_at.len(), 19);
    }

    #[test]
    fn test_plan_artifact_field_order() {
        let mut plan = StoryPlan::new();
        plan.set(PlanSection::Setting, "A lighthouse.");
        let artifact = PlanArtifact {
            plan,
            example_id: "ex_1".to_string(),
            task: "Write.".to_string(),
        };
        let json = serde_json::to_string(&artifact).unwrap();
        assert_eq!(
            json,
            r#"{"plan":{"Setting":"A lighthouse."},"example_id":"ex_1","task":"Write."}"#
        );
    }

    #[test]
    fn test_missing_path_yields_empty_plan() {
        assert_eq!(load_plan_or_empty(None), LoadedPlan::default());
    }
}
