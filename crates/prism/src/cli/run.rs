//! Story command handlers.

use prism::{
    LoadedPlan, LogSink, OutputLayout, PrismConfig, PrismResult, StageAgent, build_agent,
    build_driver, load_batch, load_plan_or_empty, process_env, resolve_output_dir,
    resolve_plan_path, resolve_story_id, resolve_task, run_batch, run_plan, run_story, run_write,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Settings shared by every story command.
#[derive(Debug, Clone)]
pub struct RunContext {
    config: PrismConfig,
    agent: StageAgent,
}

impl RunContext {
    /// Load configuration, connect the log sink and build the agent.
    pub async fn prepare(config_path: Option<&Path>, no_db: bool) -> PrismResult<Self> {
        let config = PrismConfig::load(config_path)?;
        let sink = log_sink(&config, no_db).await;
        let driver = build_driver(&config.model, config.retry)?;
        let agent = build_agent(driver, &config.model, sink);
        Ok(Self { config, agent })
    }

    fn layout(&self, output_dir: Option<PathBuf>) -> OutputLayout {
        match resolve_output_dir(output_dir, process_env) {
            Some(dir) => self.config.output.in_dir(dir),
            None => self.config.output.clone(),
        }
    }
}

#[cfg(feature = "database")]
async fn log_sink(config: &PrismConfig, no_db: bool) -> Option<Arc<dyn LogSink>> {
    if no_db || !config.database.enabled {
        info!("Stage logs are not persisted");
        return None;
    }
    match prism::connect_log_store(&config.database).await {
        Ok(store) => Some(store as Arc<dyn LogSink>),
        Err(e) => {
            warn!(error = %e, "Database unavailable, stage logs will not be persisted");
            None
        }
    }
}

#[cfg(not(feature = "database"))]
async fn log_sink(_config: &PrismConfig, no_db: bool) -> Option<Arc<dyn LogSink>> {
    if !no_db {
        warn!("Built without the database feature, stage logs will not be persisted");
    }
    None
}

/// Handle `prism plan`.
pub async fn plan_command(
    ctx: &RunContext,
    story_id: Option<String>,
    task: Option<String>,
    output_dir: Option<PathBuf>,
    plan_file: Option<PathBuf>,
) -> PrismResult<()> {
    let story_id = resolve_story_id(story_id, process_env);
    let task = resolve_task(task, process_env);
    if task.is_empty() {
        warn!("No task given, planning from an empty task");
    }
    let plan_path = plan_file.unwrap_or_else(|| ctx.layout(output_dir).plan_path());

    let (artifact, _) = run_plan(&ctx.agent, &story_id, &task, &plan_path).await;
    println!("{}", artifact.plan.to_json());
    Ok(())
}

/// Handle `prism write`.
pub async fn write_command(
    ctx: &RunContext,
    story_id: Option<String>,
    plan: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    output_txt: Option<PathBuf>,
    output_json: Option<PathBuf>,
) -> PrismResult<()> {
    let story_id = resolve_story_id(story_id, process_env);
    let layout = ctx.layout(output_dir);
    let plan_path = resolve_plan_path(plan, process_env).unwrap_or_else(|| layout.plan_path());
    let json_path = output_json.unwrap_or_else(|| layout.write_json_path());
    let text_path = output_txt.unwrap_or_else(|| layout.write_text_path());

    let loaded: LoadedPlan = load_plan_or_empty(Some(plan_path.as_path()));
    let (artifact, _) = run_write(&ctx.agent, &story_id, &loaded, &json_path, &text_path).await;
    println!("{}", artifact.full_story);
    Ok(())
}

/// Handle `prism run`.
pub async fn run_command(
    ctx: &RunContext,
    story_id: Option<String>,
    task: Option<String>,
    output_dir: Option<PathBuf>,
) -> PrismResult<()> {
    let story_id = resolve_story_id(story_id, process_env);
    let task = resolve_task(task, process_env);
    let layout = ctx.layout(output_dir);

    let (_, artifact) = run_story(&ctx.agent, &story_id, &task, &layout).await;
    println!("{}", artifact.full_story);
    Ok(())
}

/// Handle `prism batch`.
pub async fn batch_command(
    ctx: &RunContext,
    input: &Path,
    output_dir: Option<PathBuf>,
) -> PrismResult<()> {
    let items = load_batch(input)?;
    info!(count = items.len(), input = %input.display(), "Loaded batch");
    let layout = ctx.layout(output_dir);

    let results = run_batch(&ctx.agent, &items, &layout).await;
    for artifact in &results {
        println!(
            "{}\t{} chars",
            artifact.example_id,
            artifact.full_story.chars().count()
        );
    }
    Ok(())
}
