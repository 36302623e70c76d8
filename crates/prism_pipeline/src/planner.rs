//! Plan stage: devise the four plan sections, then calibrate them.

use crate::{
    CalibrationReport, PlanTarget, StageAgent, calibrate, devise_context, devise_prompt,
    plan_identifiers,
};
use prism_core::{PlanSection, StoryPlan};
use tracing::{info, instrument};

/// Log type for devising a plan section.
///
/// # Examples
///
/// ```
/// use prism_core::PlanSection;
/// use prism_pipeline::devise_log_type;
///
/// assert_eq!(devise_log_type(PlanSection::CentralConflict), "prism_devise_conflict");
/// assert_eq!(devise_log_type(PlanSection::KeyPlotPoints), "prism_devise_plot");
/// ```
pub fn devise_log_type(section: PlanSection) -> &'static str {
    match section {
        PlanSection::CentralConflict => "prism_devise_conflict",
        PlanSection::CharacterDescriptions => "prism_devise_character",
        PlanSection::Setting => "prism_devise_setting",
        PlanSection::KeyPlotPoints => "prism_devise_plot",
    }
}

/// Result of the plan stage.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct PlanOutcome {
    /// Final plan, refined if reforging succeeded
    plan: StoryPlan,
    /// Calibration record for the plan
    calibration: CalibrationReport,
}

impl PlanOutcome {
    /// Take the plan, dropping the calibration record.
    pub fn into_plan(self) -> StoryPlan {
        self.plan
    }
}

/// Devise and calibrate a story plan for `task`.
#[instrument(skip(agent, task), fields(task_chars = task.len()))]
pub async fn generate_plan(agent: &StageAgent, story_id: &str, task: &str) -> PlanOutcome {
    let mut plan = StoryPlan::new();

    for section in PlanSection::all() {
        let prompt = devise_prompt(section, &plan_identifiers(&plan));
        let context = devise_context(task, &plan);
        let text = agent
            .call(&prompt, &context, story_id, devise_log_type(section))
            .await;
        plan.set(section, text);
    }
    info!(sections = plan.present_sections().len(), "Plan devised");

    let (calibration, refined) = calibrate(agent, story_id, task, &PlanTarget { plan: &plan }).await;
    if let Some(refined) = refined {
        info!(outcome = ?calibration.outcome(), "Plan reforged");
        plan = refined;
    }

    PlanOutcome { plan, calibration }
}
