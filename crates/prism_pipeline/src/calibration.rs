//! The Prism calibration loop.
//!
//! Every draft, whether the whole plan or a single story section, passes through the same
//! five stages:
//!
//! 1. **Beam Focusing** summarizes the draft.
//! 2. **Spectrum Conference** runs a single-round role-play discussion.
//! 3. **Spectral Analysis** critiques the draft once per [`SpectrumDimension`].
//! 4. **Focal Decision** picks a revision category.
//! 5. **Beam Reforging** regenerates the draft when the category calls for it,
//!    retrying once with a stricter format instruction if the output cannot
//!    be parsed.

use crate::{
    StageAgent, parse_focal_category, parse_grade, parse_labeled_section, parse_plan_sections,
    parse_targeted_fixes, prompts,
};
use prism_core::{
    FocalCategory, GradeTally, SpectrumDimension, StoryDraft, StoryPlan, StorySection,
};
use tracing::{info, instrument, warn};

/// What a calibration pass operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationScope {
    /// The four plan sections together
    Plan,
    /// One story section
    Section(StorySection),
}

impl CalibrationScope {
    fn tagged(&self, base: &str) -> String {
        match self {
            CalibrationScope::Plan => base.to_string(),
            CalibrationScope::Section(section) => format!("{}_{}", base, section.label()),
        }
    }

    /// Log type of the Beam Focusing stage.
    pub fn focus_log_type(&self) -> String {
        match self {
            CalibrationScope::Plan => "prism_beam_focusing".to_string(),
            CalibrationScope::Section(section) => {
                format!("prism_beam_focusing_section_{}", section.label())
            }
        }
    }

    /// Log type of the Spectrum Conference stage.
    pub fn conference_log_type(&self) -> String {
        self.tagged("prism_spectrum_conference")
    }

    /// Log type of one Spectral Analysis call.
    ///
    /// # Examples
    ///
    /// ```
    /// use prism_core::{SpectrumDimension, StorySection};
    /// use prism_pipeline::CalibrationScope;
    ///
    /// assert_eq!(
    ///     CalibrationScope::Plan.spectral_log_type(SpectrumDimension::TaskAlignment),
    ///     "prism_spectral_analysis_Task Alignment"
    /// );
    /// assert_eq!(
    ///     CalibrationScope::Section(StorySection::RisingAction)
    ///         .spectral_log_type(SpectrumDimension::Depth),
    ///     "prism_spectral_analysis_Rising Action_Depth"
    /// );
    /// ```
    pub fn spectral_log_type(&self, dimension: SpectrumDimension) -> String {
        format!("{}_{}", self.tagged("prism_spectral_analysis"), dimension)
    }

    /// Log type of the Focal Decision stage.
    pub fn decision_log_type(&self) -> String {
        self.tagged("prism_focal_decision")
    }

    /// Log type of the Beam Reforging stage.
    pub fn reforge_log_type(&self) -> String {
        self.tagged("prism_beam_reforging")
    }

    /// Log type of the format-fix retry.
    pub fn reforge_retry_log_type(&self) -> String {
        self.tagged("prism_beam_reforging_retry")
    }

    fn conference_prompt(&self) -> &'static str {
        match self {
            CalibrationScope::Plan => prompts::PLAN_CONFERENCE_PROMPT,
            CalibrationScope::Section(_) => prompts::SECTION_CONFERENCE_PROMPT,
        }
    }

    fn spectral_prompt(&self, dimension: SpectrumDimension) -> String {
        match self {
            CalibrationScope::Plan => prompts::plan_spectral_prompt(dimension),
            CalibrationScope::Section(_) => prompts::section_spectral_prompt(dimension),
        }
    }

    fn decision_prompt(&self) -> &'static str {
        match self {
            CalibrationScope::Plan => prompts::PLAN_DECISION_PROMPT,
            CalibrationScope::Section(_) => prompts::SECTION_DECISION_PROMPT,
        }
    }

    fn retry_suffix(&self) -> &'static str {
        match self {
            CalibrationScope::Plan => prompts::PLAN_RETRY_SUFFIX,
            CalibrationScope::Section(_) => prompts::SECTION_RETRY_SUFFIX,
        }
    }
}

/// A draft that can be calibrated.
///
/// Implementors supply the scope-specific prompts and the parser for the
/// reforged draft; the loop itself lives in [`calibrate`].
pub trait CalibrationTarget {
    /// Parsed result of a successful Beam Reforging.
    type Refined;

    /// Scope used for prompts and log types.
    fn scope(&self) -> CalibrationScope;

    /// Beam Focusing `(prompt, context)`.
    fn focus_request(&self, task: &str) -> (String, String);

    /// Beam Reforging `(prompt, context)`.
    fn reforge_request(
        &self,
        task: &str,
        summary: &str,
        suggestions: &str,
        critiques: &str,
        transcript: &str,
    ) -> (String, String);

    /// Parse reforged output; `None` triggers the format-fix retry.
    fn parse_refinement(&self, output: &str) -> Option<Self::Refined>;
}

/// Calibration of the whole plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanTarget<'a> {
    /// Plan under review
    pub plan: &'a StoryPlan,
}

impl CalibrationTarget for PlanTarget<'_> {
    type Refined = StoryPlan;

    fn scope(&self) -> CalibrationScope {
        CalibrationScope::Plan
    }

    fn focus_request(&self, task: &str) -> (String, String) {
        (
            prompts::PLAN_FOCUS_PROMPT.to_string(),
            prompts::plan_focus_context(task, self.plan),
        )
    }

    fn reforge_request(
        &self,
        task: &str,
        summary: &str,
        suggestions: &str,
        critiques: &str,
        transcript: &str,
    ) -> (String, String) {
        (
            prompts::plan_reforge_prompt(),
            prompts::plan_reforge_context(task, summary, suggestions, critiques, transcript),
        )
    }

    fn parse_refinement(&self, output: &str) -> Option<StoryPlan> {
        parse_plan_sections(output)
    }
}

/// Calibration of one freshly woven story section.
#[derive(Debug, Clone, Copy)]
pub struct SectionTarget<'a> {
    /// Plan the story follows
    pub plan: &'a StoryPlan,
    /// Story so far, including the section under review
    pub draft: &'a StoryDraft,
    /// Section under review
    pub section: StorySection,
}

impl CalibrationTarget for SectionTarget<'_> {
    type Refined = String;

    fn scope(&self) -> CalibrationScope {
        CalibrationScope::Section(self.section)
    }

    fn focus_request(&self, task: &str) -> (String, String) {
        (
            prompts::SECTION_FOCUS_PROMPT.to_string(),
            prompts::section_focus_context(task, self.plan, self.draft),
        )
    }

    fn reforge_request(
        &self,
        task: &str,
        summary: &str,
        suggestions: &str,
        critiques: &str,
        _transcript: &str,
    ) -> (String, String) {
        (
            prompts::section_reforge_prompt(self.section),
            prompts::section_reforge_context(task, summary, suggestions, critiques),
        )
    }

    fn parse_refinement(&self, output: &str) -> Option<String> {
        parse_labeled_section(output, self.section.label())
    }
}

/// Interpretation of a Focal Decision output.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct FocalDecision {
    /// Parsed category, if any
    category: Option<FocalCategory>,
    /// Whether Beam Reforging should run
    refine: bool,
    /// Targeted fixes handed to Beam Reforging
    suggestions: String,
}

impl FocalDecision {
    /// Decide from model output.
    ///
    /// Severe and Major refine with the targeted fixes (empty if absent).
    /// Minor and No Issue keep the draft. An unparseable category refines
    /// with no suggestions.
    ///
    /// # Examples
    ///
    /// ```
    /// use prism_pipeline::FocalDecision;
    ///
    /// let decision = FocalDecision::from_output(
    ///     "Category: 'Major (majority B)'\nSuggest targeted fixes: raise the stakes",
    /// );
    /// assert!(*decision.refine());
    /// assert_eq!(decision.suggestions(), "raise the stakes");
    ///
    /// let decision = FocalDecision::from_output("Category: 'Minor (majority A with B)'");
    /// assert!(!*decision.refine());
    ///
    /// let decision = FocalDecision::from_output("I cannot decide.");
    /// assert!(*decision.refine());
    /// assert!(decision.category().is_none());
    /// ```
    pub fn from_output(output: &str) -> Self {
        match parse_focal_category(output) {
            Some(category) if category.needs_refinement() => Self {
                category: Some(category),
                refine: true,
                suggestions: parse_targeted_fixes(output).unwrap_or_default(),
            },
            Some(category) => Self {
                category: Some(category),
                refine: false,
                suggestions: String::new(),
            },
            None => Self {
                category: None,
                refine: true,
                suggestions: String::new(),
            },
        }
    }
}

/// What Beam Reforging did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementOutcome {
    /// The decision did not call for refinement
    Skipped,
    /// The first reforging parsed and replaced the draft
    Applied,
    /// The format-fix retry parsed and replaced the draft
    AppliedOnRetry,
    /// Neither attempt parsed; the draft was kept
    Kept,
}

/// Record of one calibration pass.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct CalibrationReport {
    /// Scope calibrated
    scope: CalibrationScope,
    /// Beam Focusing output
    summary: String,
    /// Spectrum Conference output
    transcript: String,
    /// Concatenated Spectral Analysis outputs
    critiques: String,
    /// Grades parsed from the critiques
    tally: GradeTally,
    /// Focal Decision interpretation
    decision: FocalDecision,
    /// What Beam Reforging did
    outcome: RefinementOutcome,
}

impl CalibrationReport {
    /// True when Beam Reforging ran at least once.
    pub fn refinement_ran(&self) -> bool {
        self.outcome != RefinementOutcome::Skipped
    }

    /// True when a reforged draft replaced the original.
    pub fn applied(&self) -> bool {
        matches!(
            self.outcome,
            RefinementOutcome::Applied | RefinementOutcome::AppliedOnRetry
        )
    }
}

/// Run one calibration pass over `target`.
///
/// Returns the report and, when reforging succeeded, the refined draft.
#[instrument(skip_all, fields(story_id = %story_id, scope = ?target.scope()))]
pub async fn calibrate<T: CalibrationTarget>(
    agent: &StageAgent,
    story_id: &str,
    task: &str,
    target: &T,
) -> (CalibrationReport, Option<T::Refined>) {
    let scope = target.scope();

    // Beam Focusing
    let (focus_prompt, focus_context) = target.focus_request(task);
    let summary = agent
        .call(&focus_prompt, &focus_context, story_id, &scope.focus_log_type())
        .await;

    // Spectrum Conference
    let transcript = agent
        .call(
            scope.conference_prompt(),
            &prompts::conference_context(task, &summary),
            story_id,
            &scope.conference_log_type(),
        )
        .await;

    // Spectral Analysis
    let spectral_context = prompts::spectral_context(task, &summary, &transcript);
    let mut critiques = String::new();
    let mut tally = GradeTally::default();
    for dimension in SpectrumDimension::all() {
        let critique = agent
            .call(
                &scope.spectral_prompt(dimension),
                &spectral_context,
                story_id,
                &scope.spectral_log_type(dimension),
            )
            .await;
        critiques.push_str(&format!("\n{} Spectral Analysis:\n{}", dimension, critique));
        match parse_grade(&critique) {
            Some(grade) => tally.record(grade),
            None => warn!(dimension = %dimension, "No grade found in critique"),
        }
    }
    info!(
        grades = tally.len(),
        mean = ?tally.mean(),
        local_category = ?tally.majority_category(),
        "Spectral analysis complete"
    );

    // Focal Decision
    let decision_output = agent
        .call(
            scope.decision_prompt(),
            &prompts::decision_context(&critiques),
            story_id,
            &scope.decision_log_type(),
        )
        .await;
    let decision = FocalDecision::from_output(&decision_output);
    info!(category = ?decision.category(), refine = decision.refine(), "Focal decision");

    // Beam Reforging
    let mut refined = None;
    let outcome = if !decision.refine {
        RefinementOutcome::Skipped
    } else {
        let (reforge_prompt, reforge_context) = target.reforge_request(
            task,
            &summary,
            &decision.suggestions,
            &critiques,
            &transcript,
        );
        let output = agent
            .call(&reforge_prompt, &reforge_context, story_id, &scope.reforge_log_type())
            .await;

        if let Some(parsed) = target.parse_refinement(&output) {
            refined = Some(parsed);
            RefinementOutcome::Applied
        } else {
            warn!("Beam Reforging parse failed, retrying with format fix");
            let retry_prompt = format!("{}{}", reforge_prompt, scope.retry_suffix());
            let retry_output = agent
                .call(
                    &retry_prompt,
                    &reforge_context,
                    story_id,
                    &scope.reforge_retry_log_type(),
                )
                .await;
            match target.parse_refinement(&retry_output) {
                Some(parsed) => {
                    refined = Some(parsed);
                    RefinementOutcome::AppliedOnRetry
                }
                None => {
                    warn!("Beam Reforging retry failed, keeping current draft");
                    RefinementOutcome::Kept
                }
            }
        }
    };

    let report = CalibrationReport {
        scope,
        summary,
        transcript,
        critiques,
        tally,
        decision,
        outcome,
    };
    (report, refined)
}
