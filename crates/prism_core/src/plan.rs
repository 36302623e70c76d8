//! Story plan types.

use prism_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Sections of a story plan, in the order they are devised.
///
/// # Examples
///
/// ```
/// use prism_core::PlanSection;
/// use std::str::FromStr;
///
/// assert_eq!(PlanSection::CentralConflict.to_string(), "Central Conflict");
/// assert_eq!(PlanSection::from_str("key plot points").unwrap(), PlanSection::KeyPlotPoints);
/// assert!(PlanSection::CentralConflict < PlanSection::Setting);
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PlanSection {
    /// The protagonist's goal and what stands in the way
    #[strum(serialize = "Central Conflict")]
    CentralConflict,
    /// Voice, appearance and motivation of each character
    #[strum(serialize = "Character Descriptions")]
    CharacterDescriptions,
    /// Where and when the story takes place
    #[strum(serialize = "Setting")]
    Setting,
    /// The major beats of the plot
    #[strum(serialize = "Key Plot Points")]
    KeyPlotPoints,
}

impl PlanSection {
    /// All plan sections in order.
    pub fn all() -> Vec<PlanSection> {
        PlanSection::iter().collect()
    }

    /// The section label as it appears in prompts and JSON.
    pub fn label(&self) -> &'static str {
        match self {
            PlanSection::CentralConflict => "Central Conflict",
            PlanSection::CharacterDescriptions => "Character Descriptions",
            PlanSection::Setting => "Setting",
            PlanSection::KeyPlotPoints => "Key Plot Points",
        }
    }
}

/// The story plan mapping.
///
/// Sections are optional while the plan is being devised. Serialization
/// lists present sections in [`PlanSection`] order and omits absent ones.
///
/// # Examples
///
/// ```
/// use prism_core::{PlanSection, StoryPlan};
///
/// let mut plan = StoryPlan::new();
/// assert!(plan.is_empty());
///
/// plan.set(PlanSection::Setting, "A lighthouse in 1952.");
/// plan.set(PlanSection::CentralConflict, "The keeper must choose.");
///
/// assert_eq!(
///     plan.present_sections(),
///     vec![PlanSection::CentralConflict, PlanSection::Setting]
/// );
/// assert_eq!(
///     plan.to_json(),
///     r#"{"Central Conflict":"The keeper must choose.","Setting":"A lighthouse in 1952."}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct StoryPlan {
    sections: BTreeMap<PlanSection, String>,
}

impl StoryPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of a section, if present.
    pub fn get(&self, section: PlanSection) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    /// Sets (or replaces) the text of a section.
    pub fn set(&mut self, section: PlanSection, text: impl Into<String>) {
        self.sections.insert(section, text.into());
    }

    /// Present sections in order.
    pub fn present_sections(&self) -> Vec<PlanSection> {
        self.sections.keys().copied().collect()
    }

    /// Iterates present sections and their text in order.
    pub fn iter(&self) -> impl Iterator<Item = (PlanSection, &str)> {
        self.sections.iter().map(|(s, t)| (*s, t.as_str()))
    }

    /// True when no section is present.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True when all four sections are present.
    pub fn is_complete(&self) -> bool {
        self.sections.len() == PlanSection::iter().count()
    }

    /// Compact JSON rendering used in prompt contexts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for StoryPlan {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (section, text) in &self.sections {
            map.serialize_entry(section.label(), text)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, String>> for StoryPlan {
    type Error = PipelineError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut plan = StoryPlan::new();
        for (key, text) in raw {
            let section = PlanSection::from_str(&key).map_err(|_| {
                PipelineError::new(PipelineErrorKind::UnknownPlanSection(key.clone()))
            })?;
            plan.set(section, text);
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_follows_section_order() {
        let mut plan = StoryPlan::new();
        plan.set(PlanSection::KeyPlotPoints, "plot");
        plan.set(PlanSection::CharacterDescriptions, "chars");
        plan.set(PlanSection::CentralConflict, "conflict");

        let json = plan.to_json();
        let conflict = json.find("Central Conflict").unwrap();
        let chars = json.find("Character Descriptions").unwrap();
        let plot = json.find("Key Plot Points").unwrap();
        assert!(conflict < chars && chars < plot);
        assert!(!json.contains("Setting"));
    }

    #[test]
    fn test_deserialize_rejects_unknown_section() {
        let result: Result<StoryPlan, _> =
            serde_json::from_str(r#"{"Central Conflict":"x","Epilogue":"y"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_complete() {
        let mut plan = StoryPlan::new();
        for section in PlanSection::all() {
            assert!(!plan.is_complete());
            plan.set(section, "text");
        }
        assert!(plan.is_complete());
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let mut plan = StoryPlan::new();
        plan.set(PlanSection::Setting, "灯塔");
        assert!(plan.to_json().contains("灯塔"));
    }
}
