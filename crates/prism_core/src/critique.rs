//! Critique vocabulary for the calibration loop.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// A band of the critique spectrum; one analyst critiques each band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SpectrumDimension {
    /// Coherence and progression
    #[strum(serialize = "Story Structure")]
    #[serde(rename = "Story Structure")]
    StoryStructure,
    /// Novelty
    #[strum(serialize = "Originality")]
    Originality,
    /// Richness of characters and setting
    #[strum(serialize = "Depth")]
    Depth,
    /// Prose craft
    #[strum(serialize = "Style")]
    Style,
    /// Fidelity to the writing task
    #[strum(serialize = "Task Alignment")]
    #[serde(rename = "Task Alignment")]
    TaskAlignment,
}

impl SpectrumDimension {
    /// All dimensions in critique order.
    pub fn all() -> Vec<SpectrumDimension> {
        SpectrumDimension::iter().collect()
    }

    /// What the analyst examines when critiquing a plan.
    pub fn plan_focus(&self) -> &'static str {
        match self {
            SpectrumDimension::StoryStructure => "coherence, consistency, and progression",
            SpectrumDimension::Originality => "innovation and avoidance of clichés",
            SpectrumDimension::Depth => "character/setting richness and believability",
            SpectrumDimension::Style => "variety, devices, and expressiveness",
            SpectrumDimension::TaskAlignment => {
                "adherence to the original task (key elements, perspective, implications)"
            }
        }
    }

    /// What the analyst examines when critiquing a story section.
    pub fn section_focus(&self) -> &'static str {
        match self {
            SpectrumDimension::StoryStructure => "coherence, consistency, and progression",
            SpectrumDimension::Originality => {
                "innovation, avoidance of clichés, and novel elements"
            }
            SpectrumDimension::Depth => "character/setting richness and believability",
            SpectrumDimension::Style => "variety, devices, and expressiveness",
            SpectrumDimension::TaskAlignment => {
                "adherence to original task (e.g., key elements, perspective, implications)"
            }
        }
    }
}

/// Letter grade assigned by an analyst.
///
/// # Examples
///
/// ```
/// use prism_core::Grade;
/// use std::str::FromStr;
///
/// assert_eq!(Grade::from_str("b").unwrap(), Grade::B);
/// assert_eq!(Grade::A.weight(), 3);
/// assert_eq!(Grade::C.weight(), 1);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Grade {
    /// Strong
    A,
    /// Adequate
    B,
    /// Weak
    C,
}

impl Grade {
    /// Numeric weight: A=3, B=2, C=1.
    pub fn weight(&self) -> u8 {
        match self {
            Grade::A => 3,
            Grade::B => 2,
            Grade::C => 1,
        }
    }
}

/// Revision category chosen by the Focal Decision stage.
///
/// # Examples
///
/// ```
/// use prism_core::FocalCategory;
/// use std::str::FromStr;
///
/// let category = FocalCategory::from_str("no issue").unwrap();
/// assert_eq!(category, FocalCategory::NoIssue);
/// assert!(!category.needs_refinement());
/// assert!(FocalCategory::Major.needs_refinement());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum FocalCategory {
    /// Majority C
    Severe,
    /// Majority B
    Major,
    /// Majority A with some B
    Minor,
    /// All A
    #[strum(serialize = "No Issue")]
    #[serde(rename = "No Issue")]
    NoIssue,
}

impl FocalCategory {
    /// Severe and Major drafts are reforged.
    pub fn needs_refinement(&self) -> bool {
        matches!(self, FocalCategory::Severe | FocalCategory::Major)
    }
}

/// Grades parsed from one round of Spectral Analysis.
///
/// # Examples
///
/// ```
/// use prism_core::{FocalCategory, Grade, GradeTally};
///
/// let mut tally = GradeTally::default();
/// tally.record(Grade::A);
/// tally.record(Grade::B);
/// tally.record(Grade::B);
///
/// assert_eq!(tally.count(Grade::B), 2);
/// assert_eq!(tally.majority_category(), Some(FocalCategory::Major));
/// assert!((tally.mean().unwrap() - 7.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GradeTally {
    /// Parsed grades in critique order.
    grades: Vec<Grade>,
}

impl GradeTally {
    /// Records one parsed grade.
    pub fn record(&mut self, grade: Grade) {
        self.grades.push(grade);
    }

    /// Number of recorded grades equal to `grade`.
    pub fn count(&self, grade: Grade) -> usize {
        self.grades.iter().filter(|g| **g == grade).count()
    }

    /// Number of recorded grades.
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    /// True when no grade could be parsed.
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Mean weight of the recorded grades.
    pub fn mean(&self) -> Option<f64> {
        if self.grades.is_empty() {
            return None;
        }
        let total: u32 = self.grades.iter().map(|g| u32::from(g.weight())).sum();
        Some(f64::from(total) / self.grades.len() as f64)
    }

    /// Category implied by the grade counts.
    ///
    /// All A is No Issue. Otherwise the most frequent grade decides, with
    /// ties resolved toward the worse grade: C is Severe, B is Major and A
    /// (mixed with B or C) is Minor.
    pub fn majority_category(&self) -> Option<FocalCategory> {
        if self.grades.is_empty() {
            return None;
        }
        let (a, b, c) = (
            self.count(Grade::A),
            self.count(Grade::B),
            self.count(Grade::C),
        );
        if a == self.grades.len() {
            Some(FocalCategory::NoIssue)
        } else if c >= b && c >= a {
            Some(FocalCategory::Severe)
        } else if b >= a {
            Some(FocalCategory::Major)
        } else {
            Some(FocalCategory::Minor)
        }
    }
}
