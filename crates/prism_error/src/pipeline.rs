//! Pipeline error types.

/// Specific error conditions for plan and story orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Unknown plan section label
    #[display("Unknown plan section: {}", _0)]
    UnknownPlanSection(String),
    /// Unknown story section label
    #[display("Unknown story section: {}", _0)]
    UnknownStorySection(String),
    /// Unknown critique grade
    #[display("Unknown grade: {}", _0)]
    UnknownGrade(String),
    /// Plan file exists but could not be read
    #[display("Failed to read plan file: {}", _0)]
    PlanFileRead(String),
    /// Plan file has neither a plan nor a scratchpad
    #[display("Plan file has no plan: {}", _0)]
    PlanFileInvalid(String),
    /// Serialization error
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Batch input could not be parsed
    #[display("Invalid batch input: {}", _0)]
    BatchInput(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use prism_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::UnknownGrade("D".to_string()));
/// assert!(format!("{}", err).contains("Unknown grade: D"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
