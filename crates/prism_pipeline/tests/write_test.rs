//! Write stage tests against a scripted driver.

mod test_utils;

use prism_core::{PlanSection, StoryPlan, StorySection};
use prism_interface::MemoryLogSink;
use prism_pipeline::{CalibrationScope, RefinementOutcome, StageAgent, generate_story};
use std::sync::Arc;
use test_utils::{ScriptedDriver, StoryScript};

const TASK: &str = "Write a story about a lighthouse keeper.";

fn plan() -> StoryPlan {
    let mut plan = StoryPlan::new();
    plan.set(PlanSection::CentralConflict, "Mara must leave the lighthouse.");
    plan.set(PlanSection::Setting, "A rocky coast, 1952.");
    plan
}

#[tokio::test]
async fn test_story_sections_and_synthesis() {
    let sink = Arc::new(MemoryLogSink::new());
    let agent = StageAgent::new(Arc::new(ScriptedDriver::scripted(StoryScript::default())))
        .with_sink(sink.clone());

    let outcome = generate_story(&agent, "ex_2", &plan(), TASK).await;

    let draft = outcome.draft();
    for section in StorySection::all() {
        assert_eq!(
            draft.get(section),
            Some(format!("Woven {}.", section.label()).as_str())
        );
    }
    assert_eq!(draft.full_story(), Some("The whole tale."));
    assert_eq!(outcome.calibrations().len(), 5);
    assert!(
        outcome
            .calibrations()
            .iter()
            .all(|r| *r.outcome() == RefinementOutcome::Skipped)
    );

    let types = sink.log_types();
    // Exposition: weave + 8 calibration calls; later sections add a prior summary.
    assert_eq!(types.len(), 9 + 4 * 10 + 2);
    assert_eq!(types[0], "prism_weave_Exposition");
    assert_eq!(types[1], "prism_beam_focusing_section_Exposition");
    assert_eq!(types[2], "prism_spectrum_conference_Exposition");
    assert_eq!(types[3], "prism_spectral_analysis_Exposition_Story Structure");
    assert_eq!(types[8], "prism_focal_decision_Exposition");
    assert_eq!(types[9], "prism_beam_focusing_prior_Rising Action");
    assert_eq!(types[10], "prism_weave_Rising Action");
    assert!(!types.iter().any(|t| t == "prism_beam_focusing_prior_Exposition"));
    assert_eq!(
        &types[types.len() - 2..],
        &["prism_full_summary", "prism_write_synthesis"]
    );
}

#[tokio::test]
async fn test_weave_prompt_names_previous_sections() {
    let driver = Arc::new(ScriptedDriver::scripted(StoryScript::default()));
    let agent = StageAgent::new(driver.clone());

    generate_story(&agent, "ex_2", &plan(), TASK).await;

    let climax_weave = driver
        .calls()
        .into_iter()
        .find(|c| c.contains("writing the Climax part"))
        .unwrap();
    assert!(climax_weave.starts_with(
        "Given a Creative Writing Task, the Central Conflict, Setting, and the Previous Sections (Exposition, Rising Action)"
    ));
}

#[tokio::test]
async fn test_section_refinement_replaces_section() {
    let sink = Arc::new(MemoryLogSink::new());
    let agent = StageAgent::new(Arc::new(ScriptedDriver::scripted(StoryScript::refining())))
        .with_sink(sink.clone());

    let outcome = generate_story(&agent, "ex_2", &plan(), TASK).await;

    for section in StorySection::all() {
        assert_eq!(
            outcome.draft().get(section),
            Some(format!("Refined {}.", section.label()).as_str())
        );
    }
    let climax = &outcome.calibrations()[2];
    assert_eq!(*climax.scope(), CalibrationScope::Section(StorySection::Climax));
    assert!(climax.applied());
    assert!(sink.log_types().iter().any(|t| t == "prism_beam_reforging_Climax"));
}

#[tokio::test]
async fn test_section_kept_when_reforging_unparseable() {
    let script = StoryScript {
        reforge_parses: false,
        retry_parses: false,
        ..StoryScript::refining()
    };
    let sink = Arc::new(MemoryLogSink::new());
    let agent = StageAgent::new(Arc::new(ScriptedDriver::scripted(script))).with_sink(sink.clone());

    let outcome = generate_story(&agent, "ex_2", &plan(), TASK).await;

    assert_eq!(
        outcome.draft().get(StorySection::Resolution),
        Some("Woven Resolution.")
    );
    assert!(
        sink.log_types()
            .iter()
            .any(|t| t == "prism_beam_reforging_retry_Resolution")
    );
}

#[tokio::test]
async fn test_story_without_plan() {
    let driver = Arc::new(ScriptedDriver::scripted(StoryScript::default()));
    let agent = StageAgent::new(driver.clone());

    let outcome = generate_story(&agent, "ex_2", &StoryPlan::new(), "").await;

    assert_eq!(outcome.draft().full_story_text(), "The whole tale.");
    assert!(driver.calls()[0].starts_with("Given a Creative Writing Task (Creative Writing Task"));
}
