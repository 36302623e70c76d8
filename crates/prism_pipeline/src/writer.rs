//! Write stage: weave each story section, calibrate it, then synthesize.

use crate::{
    CalibrationReport, FULL_SUMMARY_PROMPT, PRIOR_SUMMARY_PROMPT, SYNTHESIS_PROMPT, SectionTarget,
    StageAgent, calibrate, full_summary_context, prior_summary_context, synthesis_context,
    weave_context, weave_prompt, write_identifiers,
};
use prism_core::{StoryDraft, StoryPlan, StorySection};
use tracing::{debug, info, instrument};

/// Result of the write stage.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct StoryOutcome {
    /// Sections plus the synthesized full story
    draft: StoryDraft,
    /// One calibration record per section, in story order
    calibrations: Vec<CalibrationReport>,
}

impl StoryOutcome {
    /// Take the draft, dropping the calibration records.
    pub fn into_draft(self) -> StoryDraft {
        self.draft
    }
}

/// Write the story for `plan` section by section.
#[instrument(skip(agent, plan, task), fields(plan_sections = plan.present_sections().len()))]
pub async fn generate_story(
    agent: &StageAgent,
    story_id: &str,
    plan: &StoryPlan,
    task: &str,
) -> StoryOutcome {
    let mut draft = StoryDraft::new();
    let mut calibrations = Vec::with_capacity(StorySection::all().len());

    for section in StorySection::all() {
        let label = section.label();

        let prior_summary = if section.is_first() {
            String::new()
        } else {
            agent
                .call(
                    PRIOR_SUMMARY_PROMPT,
                    &prior_summary_context(task, &draft.before(section)),
                    story_id,
                    &format!("prism_beam_focusing_prior_{}", label),
                )
                .await
        };

        let prompt = weave_prompt(section, &write_identifiers(plan, &draft));
        let woven = agent
            .call(
                &prompt,
                &weave_context(task, plan, &prior_summary),
                story_id,
                &format!("prism_weave_{}", label),
            )
            .await;
        draft.set(section, woven);
        debug!(section = label, "Section woven");

        let target = SectionTarget {
            plan,
            draft: &draft,
            section,
        };
        let (report, refined) = calibrate(agent, story_id, task, &target).await;
        if let Some(text) = refined {
            draft.set(section, text);
        }
        info!(section = label, outcome = ?report.outcome(), "Section calibrated");
        calibrations.push(report);
    }

    let full_summary = agent
        .call(
            FULL_SUMMARY_PROMPT,
            &full_summary_context(task, &draft),
            story_id,
            "prism_full_summary",
        )
        .await;
    let full_story = agent
        .call(
            SYNTHESIS_PROMPT,
            &synthesis_context(task, &full_summary, &draft),
            story_id,
            "prism_write_synthesis",
        )
        .await;
    draft.set_full_story(full_story);
    info!(chars = draft.full_story_text().len(), "Story synthesized");

    StoryOutcome {
        draft,
        calibrations,
    }
}
