//! Plan stage tests against a scripted driver.

mod test_utils;

use prism_core::{FocalCategory, Grade, PlanSection};
use prism_interface::MemoryLogSink;
use prism_pipeline::{LLM_ERROR_PREFIX, RefinementOutcome, StageAgent, generate_plan};
use std::sync::Arc;
use test_utils::{FailingLogSink, ScriptedDriver, StoryScript};

const TASK: &str = "Write a story about a lighthouse keeper.";

fn agent(driver: ScriptedDriver) -> (StageAgent, Arc<MemoryLogSink>) {
    let sink = Arc::new(MemoryLogSink::new());
    let agent = StageAgent::new(Arc::new(driver)).with_sink(sink.clone());
    (agent, sink)
}

fn calibration_log_types() -> Vec<String> {
    vec![
        "prism_beam_focusing".to_string(),
        "prism_spectrum_conference".to_string(),
        "prism_spectral_analysis_Story Structure".to_string(),
        "prism_spectral_analysis_Originality".to_string(),
        "prism_spectral_analysis_Depth".to_string(),
        "prism_spectral_analysis_Style".to_string(),
        "prism_spectral_analysis_Task Alignment".to_string(),
        "prism_focal_decision".to_string(),
    ]
}

#[tokio::test]
async fn test_plan_without_refinement_keeps_devised_sections() {
    let (agent, sink) = agent(ScriptedDriver::scripted(StoryScript::default()));

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    for section in PlanSection::all() {
        assert_eq!(
            outcome.plan().get(section),
            Some(format!("Devised {}.", section.label()).as_str())
        );
    }
    let report = outcome.calibration();
    assert_eq!(*report.outcome(), RefinementOutcome::Skipped);
    assert_eq!(report.decision().category(), &Some(FocalCategory::NoIssue));
    assert_eq!(report.tally().count(Grade::A), 5);

    let mut expected = vec![
        "prism_devise_conflict".to_string(),
        "prism_devise_character".to_string(),
        "prism_devise_setting".to_string(),
        "prism_devise_plot".to_string(),
    ];
    expected.extend(calibration_log_types());
    assert_eq!(sink.log_types(), expected);
}

#[tokio::test]
async fn test_plan_completes_when_log_sink_fails() {
    let driver = Arc::new(ScriptedDriver::scripted(StoryScript::default()));
    let sink = Arc::new(FailingLogSink::new());
    let agent = StageAgent::new(driver.clone()).with_sink(sink.clone());

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    assert!(outcome.plan().is_complete());
    for section in PlanSection::all() {
        assert_eq!(
            outcome.plan().get(section),
            Some(format!("Devised {}.", section.label()).as_str())
        );
    }
    assert_eq!(
        outcome.calibration().decision().category(),
        &Some(FocalCategory::NoIssue)
    );
    assert_eq!(driver.calls().len(), 12);
    assert_eq!(sink.attempts(), 12);
}

#[tokio::test]
async fn test_devise_prompts_name_sections_so_far() {
    let driver = Arc::new(ScriptedDriver::scripted(StoryScript::default()));
    let agent = StageAgent::new(driver.clone());

    generate_plan(&agent, "ex_1", TASK).await;

    let calls = driver.calls();
    assert!(calls[0].starts_with("Given a Creative Writing Task, describe the central conflict"));
    assert!(calls[0].ends_with(&format!("Original Task: {}", TASK)));
    assert!(calls[1].starts_with("Given the Central Conflict, describe the characters"));
    assert!(calls[1].contains("Plan so far: {\"Central Conflict\":\"Devised Central Conflict.\"}"));
    assert!(calls[3].starts_with(
        "Given the Central Conflict, the Character Descriptions, the Setting, describe the key plot points"
    ));
}

#[tokio::test]
async fn test_plan_refinement_replaces_all_sections() {
    let (agent, sink) = agent(ScriptedDriver::scripted(StoryScript::refining()));

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    for section in PlanSection::all() {
        assert_eq!(
            outcome.plan().get(section),
            Some(format!("Refined {}.", section.label()).as_str())
        );
    }
    let report = outcome.calibration();
    assert_eq!(*report.outcome(), RefinementOutcome::Applied);
    assert_eq!(report.decision().suggestions(), "sharpen the conflict");
    assert_eq!(report.tally().count(Grade::B), 5);
    assert!(report.critiques().contains("\nDepth Spectral Analysis:\nGrade: B"));
    assert_eq!(
        sink.log_types().last().map(String::as_str),
        Some("prism_beam_reforging")
    );
}

#[tokio::test]
async fn test_plan_refinement_retry_succeeds() {
    let script = StoryScript {
        reforge_parses: false,
        ..StoryScript::refining()
    };
    let (agent, sink) = agent(ScriptedDriver::scripted(script));

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    assert_eq!(*outcome.calibration().outcome(), RefinementOutcome::AppliedOnRetry);
    assert_eq!(
        outcome.plan().get(PlanSection::Setting),
        Some("Refined Setting.")
    );
    let types = sink.log_types();
    assert_eq!(
        &types[types.len() - 2..],
        &["prism_beam_reforging", "prism_beam_reforging_retry"]
    );
}

#[tokio::test]
async fn test_plan_kept_when_retry_fails() {
    let script = StoryScript {
        reforge_parses: false,
        retry_parses: false,
        ..StoryScript::refining()
    };
    let (agent, _sink) = agent(ScriptedDriver::scripted(script));

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    assert_eq!(*outcome.calibration().outcome(), RefinementOutcome::Kept);
    assert!(outcome.calibration().refinement_ran());
    assert!(!outcome.calibration().applied());
    assert_eq!(
        outcome.plan().get(PlanSection::Setting),
        Some("Devised Setting.")
    );
}

#[tokio::test]
async fn test_minor_category_skips_refinement() {
    let script = StoryScript {
        decision: "Category: 'Minor (majority A with B)'\nTargeted fixes: polish".to_string(),
        ..StoryScript::refining()
    };
    let (agent, sink) = agent(ScriptedDriver::scripted(script));

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    assert_eq!(*outcome.calibration().outcome(), RefinementOutcome::Skipped);
    assert!(!sink.log_types().iter().any(|t| t.starts_with("prism_beam_reforging")));
}

#[tokio::test]
async fn test_failed_calls_are_absorbed() {
    let (agent, sink) = agent(ScriptedDriver::failing());

    let outcome = generate_plan(&agent, "ex_1", TASK).await;

    for section in PlanSection::all() {
        let text = outcome.plan().get(section).unwrap_or_default();
        assert!(text.starts_with(LLM_ERROR_PREFIX), "{}", text);
    }
    let report = outcome.calibration();
    assert!(report.decision().category().is_none());
    assert!(report.tally().is_empty());
    assert_eq!(*report.outcome(), RefinementOutcome::Kept);

    // devise x4, focus, conference, spectral x5, decision, reforge, retry
    assert_eq!(sink.log_types().len(), 14);
    let first = &sink.records()[0];
    assert_eq!(first.story_id(), "ex_1");
    assert!(first.response_message().starts_with(LLM_ERROR_PREFIX));
}
