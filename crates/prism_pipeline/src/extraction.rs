//! Utilities for extracting structured fields from stage output.
//!
//! Model output is free text. These parsers look for the labels the prompts
//! ask for and tolerate the usual decoration: markdown emphasis around
//! labels, varying case and whitespace, and qualifiers after a category.

use prism_core::{FocalCategory, Grade, PlanSection, StoryPlan};
use regex::Regex;
use std::str::FromStr;

/// Compile a pattern, logging instead of panicking on failure.
fn pattern(re: &str) -> Option<Regex> {
    match Regex::new(re) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!(pattern = re, error = %e, "Invalid extraction pattern");
            None
        }
    }
}

/// Pattern fragment matching `label:` with optional emphasis markers.
fn label_pattern(label: &str) -> String {
    let words: Vec<String> = label.split_whitespace().map(regex::escape).collect();
    format!(r"{}\s*\**\s*:\s*\**", words.join(r"\s+"))
}

/// Trim whitespace and stray emphasis markers from a captured body.
fn clean(body: &str) -> &str {
    body.trim()
        .trim_start_matches("**")
        .trim_start()
        .trim_end_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
}

/// Extract the first `Grade: X` from a critique.
///
/// # Examples
///
/// ```
/// use prism_core::Grade;
/// use prism_pipeline::parse_grade;
///
/// assert_eq!(parse_grade("Grade: B\n- tighten the middle"), Some(Grade::B));
/// assert_eq!(parse_grade("**Grade:** a"), Some(Grade::A));
/// assert_eq!(parse_grade("Grade: Average"), None);
/// assert_eq!(parse_grade("No grade here"), None);
/// ```
pub fn parse_grade(text: &str) -> Option<Grade> {
    let re = pattern(r"(?i)grade\s*\**\s*:\s*\**\s*\[?([abc])\b")?;
    let caps = re.captures(text)?;
    Grade::from_str(caps.get(1)?.as_str()).ok()
}

/// Extract the revision category from a Focal Decision.
///
/// Accepts `category: 'Severe (majority C)'`, `Category: Major` and
/// similar; the quote and any trailing qualifier are optional.
///
/// # Examples
///
/// ```
/// use prism_core::FocalCategory;
/// use prism_pipeline::parse_focal_category;
///
/// assert_eq!(
///     parse_focal_category("Output category: 'Severe (majority C)'"),
///     Some(FocalCategory::Severe)
/// );
/// assert_eq!(
///     parse_focal_category("**Category:** No Issue (all A)"),
///     Some(FocalCategory::NoIssue)
/// );
/// assert_eq!(parse_focal_category("Looks fine overall."), None);
/// ```
pub fn parse_focal_category(text: &str) -> Option<FocalCategory> {
    let re = pattern(
        r#"(?i)category\s*\**\s*:\s*\**\s*['"‘’“”]?\s*(severe|major|minor|no\s+issue)\b"#,
    )?;
    let caps = re.captures(text)?;
    let raw = caps.get(1)?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    FocalCategory::from_str(&raw).ok()
}

/// Extract everything after `targeted fixes:`.
///
/// # Examples
///
/// ```
/// use prism_pipeline::parse_targeted_fixes;
///
/// let decision = "Category: 'Major (majority B)'\nSuggest targeted fixes:\n- deepen the rival\n- cut the prologue";
/// assert_eq!(
///     parse_targeted_fixes(decision).as_deref(),
///     Some("- deepen the rival\n- cut the prologue")
/// );
/// assert_eq!(parse_targeted_fixes("Category: Minor"), None);
/// ```
pub fn parse_targeted_fixes(text: &str) -> Option<String> {
    let re = pattern(r"(?is)targeted\s+fixes\s*\**\s*:\s*\**(.*)")?;
    let caps = re.captures(text)?;
    let body = clean(caps.get(1)?.as_str());
    (!body.is_empty()).then(|| body.to_string())
}

/// Extract everything after the first `label:`.
///
/// Returns `None` when the label is missing or nothing follows it.
///
/// # Examples
///
/// ```
/// use prism_pipeline::parse_labeled_section;
///
/// let output = "Here is the refinement.\n**Rising Action:** The storm broke.";
/// assert_eq!(
///     parse_labeled_section(output, "Rising Action").as_deref(),
///     Some("The storm broke.")
/// );
/// assert_eq!(parse_labeled_section("Climax:", "Climax"), None);
/// ```
pub fn parse_labeled_section(text: &str, label: &str) -> Option<String> {
    let re = pattern(&format!(r"(?is){}(.*)", label_pattern(label)))?;
    let caps = re.captures(text)?;
    let body = clean(caps.get(1)?.as_str());
    (!body.is_empty()).then(|| body.to_string())
}

/// Extract all four labeled plan sections.
///
/// Each section runs from its label to the next plan label or the end of
/// the text. Returns `None` unless every section is present and non-empty.
///
/// # Examples
///
/// ```
/// use prism_core::PlanSection;
/// use prism_pipeline::parse_plan_sections;
///
/// let output = "Central Conflict: Mara must leave.\n\
///     Character Descriptions: Mara, stubborn.\n\
///     Setting: A lighthouse, 1952.\n\
///     Key Plot Points: - The storm";
/// let plan = parse_plan_sections(output).unwrap();
/// assert_eq!(plan.get(PlanSection::Setting), Some("A lighthouse, 1952."));
///
/// assert!(parse_plan_sections("Central Conflict: only one").is_none());
/// ```
pub fn parse_plan_sections(text: &str) -> Option<StoryPlan> {
    let sections = PlanSection::all();

    // Locate each label: (section, label start, body start)
    let mut found = Vec::with_capacity(sections.len());
    for section in &sections {
        let re = pattern(&format!("(?i){}", label_pattern(section.label())))?;
        let m = re.find(text)?;
        found.push((*section, m.start(), m.end()));
    }

    let mut plan = StoryPlan::new();
    for (section, _, body_start) in &found {
        let body_end = found
            .iter()
            .map(|(_, start, _)| *start)
            .filter(|start| start >= body_start)
            .min()
            .unwrap_or(text.len());
        let body = clean(&text[*body_start..body_end]);
        if body.is_empty() {
            return None;
        }
        plan.set(*section, body);
    }
    Some(plan)
}

/// Parse a legacy `[Label] body` scratchpad.
///
/// Returns the plan sections found and the `[Creative Writing Task]` body
/// if present. Each body runs until the next `[` or the end of the text.
///
/// # Examples
///
/// ```
/// use prism_core::PlanSection;
/// use prism_pipeline::parse_scratchpad;
///
/// let scratchpad = "[Creative Writing Task] Write about a lighthouse.\n\
///     [Central Conflict] Mara must leave.\n\
///     [Setting] 1952.";
/// let (plan, task) = parse_scratchpad(scratchpad);
/// assert_eq!(task.as_deref(), Some("Write about a lighthouse."));
/// assert_eq!(plan.get(PlanSection::CentralConflict), Some("Mara must leave."));
/// assert_eq!(plan.get(PlanSection::KeyPlotPoints), None);
/// ```
pub fn parse_scratchpad(text: &str) -> (StoryPlan, Option<String>) {
    let mut plan = StoryPlan::new();
    for section in PlanSection::all() {
        if let Some(body) = bracketed_block(text, section.label()) {
            plan.set(section, body);
        }
    }
    (plan, bracketed_block(text, "Creative Writing Task"))
}

fn bracketed_block(text: &str, label: &str) -> Option<String> {
    let re = pattern(&format!(r"(?s)\[{}\]\s*([^\[]*)", regex::escape(label)))?;
    let caps = re.captures(text)?;
    Some(caps.get(1)?.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_takes_first_match() {
        let text = "Grade: C\nEarlier draft was Grade: A";
        assert_eq!(parse_grade(text), Some(Grade::C));
    }

    #[test]
    fn test_grade_with_spacing_and_bracket() {
        assert_eq!(parse_grade("GRADE :  [B]"), Some(Grade::B));
        assert_eq!(parse_grade("Grade: B+ overall"), Some(Grade::B));
    }

    #[test]
    fn test_category_variants() {
        let cases = [
            ("category: 'Major'", FocalCategory::Major),
            ("Category: “Minor (majority A with B)”", FocalCategory::Minor),
            ("CATEGORY: no   issue", FocalCategory::NoIssue),
            ("Output category: Severe", FocalCategory::Severe),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_focal_category(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_category_requires_label() {
        assert_eq!(parse_focal_category("This is a Severe problem."), None);
    }

    #[test]
    fn test_targeted_fixes_without_suggest_prefix() {
        let text = "Targeted Fixes: tighten pacing";
        assert_eq!(parse_targeted_fixes(text).as_deref(), Some("tighten pacing"));
    }

    #[test]
    fn test_plan_sections_with_markdown_labels() {
        let text = "Here is the refined plan.\n\n\
            **Central Conflict:** Mara must leave the light.\n\n\
            **Character Descriptions:** Mara, 60, stubborn.\n\n\
            **Setting:** Maine, 1952.\n\n\
            **Key Plot Points:**\n- The storm\n- The rescue";
        let plan = parse_plan_sections(text).unwrap();
        assert_eq!(
            plan.get(PlanSection::CentralConflict),
            Some("Mara must leave the light.")
        );
        assert_eq!(
            plan.get(PlanSection::CharacterDescriptions),
            Some("Mara, 60, stubborn.")
        );
        assert_eq!(plan.get(PlanSection::Setting), Some("Maine, 1952."));
        assert_eq!(
            plan.get(PlanSection::KeyPlotPoints),
            Some("- The storm\n- The rescue")
        );
    }

    #[test]
    fn test_plan_sections_reject_empty_body() {
        let text = "Central Conflict:\nCharacter Descriptions: a\nSetting: b\nKey Plot Points: c";
        assert!(parse_plan_sections(text).is_none());
    }

    #[test]
    fn test_plan_sections_reject_error_output() {
        assert!(parse_plan_sections("[ERROR] LLM call failed: timeout").is_none());
    }

    #[test]
    fn test_labeled_section_is_case_insensitive() {
        let text = "falling action: The tide went out.";
        assert_eq!(
            parse_labeled_section(text, "Falling Action").as_deref(),
            Some("The tide went out.")
        );
    }

    #[test]
    fn test_scratchpad_without_task() {
        let (plan, task) = parse_scratchpad("[Key Plot Points] - one\n- two");
        assert!(task.is_none());
        assert_eq!(plan.get(PlanSection::KeyPlotPoints), Some("- one\n- two"));
    }
}
