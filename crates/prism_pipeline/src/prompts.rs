//! Prompt templates for every pipeline stage.
//!
//! Each stage sends `prompt + "\n" + context`; the helpers here build both
//! halves so the planner, writer and calibration loop stay free of prose.

use prism_core::{PlanSection, SpectrumDimension, StoryDraft, StoryPlan, StorySection};

/// System message sent with every stage request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a creative writing assistant following the given prompt strictly.";

/// Appended to the plan reforging prompt on the format-fix retry.
pub const PLAN_RETRY_SUFFIX: &str = " Strictly follow the exact output keys and format.";

/// Appended to the section reforging prompt on the format-fix retry.
pub const SECTION_RETRY_SUFFIX: &str = " Strictly follow the output format with exact key.";

/// Identifier list for plan prompts.
///
/// `"a Creative Writing Task"` while the plan is empty, otherwise
/// `"the <Section>"` for each present section.
///
/// # Examples
///
/// ```
/// use prism_core::{PlanSection, StoryPlan};
/// use prism_pipeline::plan_identifiers;
///
/// let mut plan = StoryPlan::new();
/// assert_eq!(plan_identifiers(&plan), "a Creative Writing Task");
///
/// plan.set(PlanSection::CentralConflict, "...");
/// plan.set(PlanSection::CharacterDescriptions, "...");
/// assert_eq!(plan_identifiers(&plan), "the Central Conflict, the Character Descriptions");
/// ```
pub fn plan_identifiers(plan: &StoryPlan) -> String {
    if plan.is_empty() {
        return "a Creative Writing Task".to_string();
    }
    plan.present_sections()
        .iter()
        .map(|s| format!("the {}", s.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Identifier list for the weave prompt.
///
/// # Examples
///
/// ```
/// use prism_core::{PlanSection, StoryDraft, StoryPlan, StorySection};
/// use prism_pipeline::write_identifiers;
///
/// let mut plan = StoryPlan::new();
/// plan.set(PlanSection::CentralConflict, "...");
/// plan.set(PlanSection::Setting, "...");
/// let mut draft = StoryDraft::new();
/// draft.set(StorySection::Exposition, "...");
///
/// assert_eq!(
///     write_identifiers(&plan, &draft),
///     "a Creative Writing Task, the Central Conflict, Setting, and the Previous Sections (Exposition)"
/// );
/// assert_eq!(
///     write_identifiers(&StoryPlan::new(), &StoryDraft::new()),
///     "a Creative Writing Task"
/// );
/// ```
pub fn write_identifiers(plan: &StoryPlan, draft: &StoryDraft) -> String {
    let mut identifiers = "a Creative Writing Task".to_string();
    let plan_sections = plan.present_sections();
    if !plan_sections.is_empty() {
        let labels: Vec<&str> = plan_sections.iter().map(PlanSection::label).collect();
        identifiers.push_str(&format!(", the {}", labels.join(", ")));
    }
    let story_sections = draft.present_sections();
    if !story_sections.is_empty() {
        let labels: Vec<&str> = story_sections.iter().map(StorySection::label).collect();
        identifiers.push_str(&format!(
            ", and the Previous Sections ({})",
            labels.join(", ")
        ));
    }
    identifiers
}

// ---------------------------------------------------------------------------
// Plan devising
// ---------------------------------------------------------------------------

/// Prompt devising one plan section.
pub fn devise_prompt(section: PlanSection, identifiers: &str) -> String {
    let body = match section {
        PlanSection::CentralConflict => {
            "describe the central conflict in detail (more than 5 sentences). \
             The description should answer the following questions: \
             ⋆ What’s the protagonist’s main goal in this story? \
             ⋆ Why do they want it? \
             ⋆ What’s stopping them from achieving it?"
        }
        PlanSection::CharacterDescriptions => {
            "describe the characters in detailed bullet points (more than 5 sentences for each character). \
             The description should answer the following questions: \
             ⋆ What do the characters sound like? Are they talkative or quiet? What kind of slang do they use? What is their sense of humor like? \
             ⋆ What do they look like? Do they have any defining gestures? What’s the first thing people notice about them? \
             ⋆ What are their motivations and internal characteristics? What are their flaws? What are their values? What are they afraid of? \
             How will they change and grow over the course of this story?"
        }
        PlanSection::Setting => {
            "describe the setting in detail (more than 5 sentences). \
             The description should answer the following questions: \
             ⋆ Where does the story take place? Is it set in a fictional world, or is it simply set in someone’s backyard? \
             ⋆ When does the story take place? What decade is it set in? How much time elapses over the course of the story?"
        }
        PlanSection::KeyPlotPoints => "describe the key plot points in detailed bullet points.",
    };
    format!("Given {}, {}", identifiers, body)
}

/// Context for devising a plan section.
///
/// The first section sees only the task; later ones also see the plan so far.
pub fn devise_context(task: &str, plan: &StoryPlan) -> String {
    if plan.is_empty() {
        format!("Original Task: {}", task)
    } else {
        format!("Original Task: {}\n\nPlan so far: {}", task, plan.to_json())
    }
}

/// Element list named in the plan reforging output format.
pub fn plan_output_format() -> String {
    PlanSection::all()
        .iter()
        .map(|s| format!("{}: <refined text>\n", s.label()))
        .collect()
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Prompt summarizing the sections written before the current one.
pub const PRIOR_SUMMARY_PROMPT: &str = "Beam Focusing: summarize the previous story sections concisely, focusing on plot progression, character arcs, and key details \
while preserving the original task's requirements. Retain sufficient details for expansive story generation. Output a compact beam-focused summary.";

/// Context for the prior-sections summary.
pub fn prior_summary_context(task: &str, previous: &StoryDraft) -> String {
    format!(
        "Original Task: {}\n\nPrevious Sections: {}",
        task,
        previous.to_json()
    )
}

/// Prompt weaving one story section.
pub fn weave_prompt(section: StorySection, identifiers: &str) -> String {
    let label = section.label();
    format!(
        "Given {identifiers} (Creative Writing Task, Central Conflict, Character Descriptions, Setting, Key Plot Points, and Previous Sections), \
         continue the story by writing the {label} part. Generate detailed, expansive content. \
         Begin your portion of the story in a way that naturally flows from the previous ending. Match the writing style, vocabulary, and overall mood of the existing text. \
         Do not re-explain details or events that have already been described. \
         Focus only on the {label} part of the story. Do not write about the following parts of the story. Do not end the story (unless Resolution). \
         Ensure fidelity to the original task."
    )
}

/// Context for weaving a section.
pub fn weave_context(task: &str, plan: &StoryPlan, prior_summary: &str) -> String {
    format!(
        "Original Task: {}\n\nPlan: {}\n\nPrevious Sections Summary: {}",
        task,
        plan.to_json(),
        prior_summary
    )
}

/// Prompt summarizing all refined sections before synthesis.
pub const FULL_SUMMARY_PROMPT: &str = "Beam Focusing: summarize all refined sections concisely, focusing on overall plot, character arcs, and key details \
while preserving the original task's requirements. Retain sufficient details for expansive story generation. Output a compact beam-focused summary.";

/// Context for the full summary.
pub fn full_summary_context(task: &str, draft: &StoryDraft) -> String {
    format!("Original Task: {}\n\nRefined Sections: {}", task, draft.to_json())
}

/// Prompt synthesizing the complete narrative.
pub const SYNTHESIS_PROMPT: &str = "Given all refined sections from story dict, synthesize the full story. Ensure overall coherence, resolve any inconsistencies, and optimize for all dimensions. \
Generate a complete, expansive narrative. \
Output the complete narrative, strictly following the original task (e.g., perspective, ignoring word limits for fuller content).";

/// Context for synthesis.
pub fn synthesis_context(task: &str, full_summary: &str, draft: &StoryDraft) -> String {
    format!(
        "Original Task: {}\n\nFull Sections Summary: {}\n\nRefined Sections: {}",
        task,
        full_summary,
        draft.to_json()
    )
}

// ---------------------------------------------------------------------------
// Calibration
// ---------------------------------------------------------------------------

/// Beam Focusing prompt for the whole plan.
pub const PLAN_FOCUS_PROMPT: &str = "Perform Beam Focusing: produce a compact, beam-focused summary of the current plan elements (Central Conflict, Character Descriptions, Setting, Key Plot Points). \
Focus on the essential information needed to support downstream spectrum analysis and generation. Keep it concise but retain details required for expansive story generation. \
Output a compact summary for subsequent agents.";

/// Beam Focusing prompt for the story so far.
pub const SECTION_FOCUS_PROMPT: &str = "Beam Focusing: summarize the current story so far (including the new section) concisely, focusing on plot progression, character arcs, and key details \
while preserving the original task's requirements. Retain sufficient details for expansive refinement. Output a compact beam-focused summary.";

/// Spectrum Conference prompt for the plan.
pub const PLAN_CONFERENCE_PROMPT: &str = "Initiate a Spectrum Conference: based on the beam-focused summary, run a single-round multi-agent collaborative discussion. \
Assign adaptive roles: Coherence Coordinator (structure), Innovator (originality), Expander (depth), Stylist (style). \
Agents should exchange ideas synergistically: propose improvements, briefly reflect on others' points, and build toward unified suggestions. \
Produce a transcript (more than 10 exchanges) and conclude with consolidated, actionable suggestions aligned with the original task.";

/// Spectrum Conference prompt for a section.
pub const SECTION_CONFERENCE_PROMPT: &str = "Initiate a Spectrum Conference: given the beam-focused summary of the section, run a single-round multi-agent collaborative discussion. \
Assign roles adaptively: Coherence Coordinator (structure), Innovator (originality), Expander (depth), Stylist (style). \
Agents should exchange ideas synergistically: debate improvements, reflect briefly on others' ideas, and build toward unified suggestions. \
Produce a transcript (more than 10 exchanges) and conclude with consolidated, actionable suggestions aligned with the original task.";

/// Context shared by both conference scopes.
pub fn conference_context(task: &str, summary: &str) -> String {
    format!("Original Task: {}\n\nBeam Focused Summary: {}", task, summary)
}

/// Spectral Analysis prompt for one plan dimension.
pub fn plan_spectral_prompt(dimension: SpectrumDimension) -> String {
    format!(
        "Perform Spectral Analysis for one spectrum band: {dim}. \
         For the {dim} Analyst: provide an assessment (grade A/B/C with evidence) focused on {focus}. \
         Start with Grade: X\nThen provide bullet-pointed suggestions.",
        dim = dimension,
        focus = dimension.plan_focus()
    )
}

/// Spectral Analysis prompt for one section dimension.
pub fn section_spectral_prompt(dimension: SpectrumDimension) -> String {
    format!(
        "Perform Spectral Analysis for one spectrum band: {dim}. \
         For {dim} Analyst: Assess {focus} (grade A/B/C, with evidence). \
         Start with Grade: X\nThen bullet points with suggestions. Ensure suggestions align with the original task.",
        dim = dimension,
        focus = dimension.section_focus()
    )
}

/// Context shared by both spectral scopes.
pub fn spectral_context(task: &str, summary: &str, transcript: &str) -> String {
    format!(
        "Original Task: {}\n\nBeam Focused Summary: {}\n\nSpectrum Conference Transcript: {}",
        task, summary, transcript
    )
}

/// Focal Decision prompt for the plan.
pub const PLAN_DECISION_PROMPT: &str = "Conduct a Focal Decision: given the spectral analyses, determine revision category. Compute average grade (or majority). \
Output category as one of: 'Severe (majority C)' / 'Major (majority B)' / 'Minor (majority A with B)' / 'No Issue (all A)'. \
Provide reasons and confidence (High/Medium/Low). If category is below B, list targeted fixes.";

/// Focal Decision prompt for a section.
pub const SECTION_DECISION_PROMPT: &str = "Conduct a Focal Decision: given the spectral analyses (temporary), determine revisions for the section. \
Calculate majority grade (A/B/C by count). Output category: 'Severe (majority C)' / 'Major (majority B)' / 'Minor (majority A with B)' / 'No Issue (all A)', \
with reasons and confidence (High/Medium/Low). If <B, suggest targeted fixes.";

/// Context shared by both decision scopes.
pub fn decision_context(critiques: &str) -> String {
    format!("Spectral Analyses: {}", critiques)
}

/// Beam Reforging prompt for the plan.
pub fn plan_reforge_prompt() -> String {
    format!(
        "Perform Beam Reforging: based on the beam-focused summary, spectral analyses, and focal decision suggestions, refine each plan element \
         (Central Conflict, Character Descriptions, Setting, Key Plot Points). \
         Produce detailed, expanded refinements that support longer story generation. Output in exact format:\n{}\
         Ensure refinements enhance all relevant spectrum dimensions and strictly follow the original task.",
        plan_output_format()
    )
}

/// Beam Reforging context for the plan.
pub fn plan_reforge_context(
    task: &str,
    summary: &str,
    suggestions: &str,
    critiques: &str,
    transcript: &str,
) -> String {
    format!(
        "Original Task: {}\n\nBeam Focused Summary: {}\n\nFocal Decision Suggestions: {}\n\nSpectral Analyses: {}\n\nSpectrum Conference: {}",
        task, summary, suggestions, critiques, transcript
    )
}

/// Beam Reforging prompt for a section.
pub fn section_reforge_prompt(section: StorySection) -> String {
    let label = section.label();
    format!(
        "Perform Beam Reforging: given the beam-focused summary, spectral analyses, and focal decision suggestions (temporary), refine the {label}. \
         Inject creative elements if Originality grade <B. Generate detailed, expansive refinements. \
         Output: {label}: <refined text> Ensure refinements match original task's style and requirements."
    )
}

/// Beam Reforging context for a section.
pub fn section_reforge_context(
    task: &str,
    summary: &str,
    suggestions: &str,
    critiques: &str,
) -> String {
    format!(
        "Original Task: {}\n\nBeam Focused Summary: {}\n\nDecision Suggestions: {}\n\nSpectral Analyses: {}",
        task, summary, suggestions, critiques
    )
}

/// Context for the section Beam Focusing stage.
pub fn section_focus_context(task: &str, plan: &StoryPlan, draft: &StoryDraft) -> String {
    format!(
        "Original Task: {}\n\nPlan: {}\n\nCurrent Story Sections: {}",
        task,
        plan.to_json(),
        draft.to_json()
    )
}

/// Context for the plan Beam Focusing stage.
pub fn plan_focus_context(task: &str, plan: &StoryPlan) -> String {
    format!("Original Task: {}\n\nCurrent Plan: {}", task, plan.to_json())
}
