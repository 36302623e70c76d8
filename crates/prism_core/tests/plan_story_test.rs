use prism_core::{PlanSection, StoryDraft, StoryPlan, StorySection};

#[test]
fn test_plan_json_round_trip_preserves_sections() {
    let mut plan = StoryPlan::new();
    plan.set(PlanSection::CentralConflict, "A keeper must abandon the light.");
    plan.set(PlanSection::KeyPlotPoints, "- The storm\n- The choice");

    let json = serde_json::to_string_pretty(&plan).unwrap();
    let restored: StoryPlan = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, plan);
    assert_eq!(restored.get(PlanSection::Setting), None);
}

#[test]
fn test_plan_sections_accept_case_insensitive_labels() {
    let plan: StoryPlan =
        serde_json::from_str(r#"{"central conflict":"x","SETTING":"y"}"#).unwrap();
    assert_eq!(
        plan.present_sections(),
        vec![PlanSection::CentralConflict, PlanSection::Setting]
    );
}

#[test]
fn test_draft_without_full_story_joins_trimmed_sections() {
    let mut draft = StoryDraft::new();
    draft.set(StorySection::Resolution, "  The end.\n");
    draft.set(StorySection::Exposition, "\nThe start.  ");

    assert_eq!(draft.full_story_text(), "The start.\n\nThe end.");
}

#[test]
fn test_draft_before_keeps_only_earlier_sections() {
    let mut draft = StoryDraft::new();
    for section in StorySection::all() {
        draft.set(section, section.label());
    }
    draft.set_full_story("all");

    let prior = draft.before(StorySection::Climax);
    assert_eq!(
        prior.present_sections(),
        vec![StorySection::Exposition, StorySection::RisingAction]
    );
    assert_eq!(prior.full_story(), None);
}
