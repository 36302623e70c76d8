//! Story draft types.

use prism_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Key under which the synthesized narrative is stored.
pub const FULL_STORY_KEY: &str = "Full Story";

/// Sections of a story, in the order they are written.
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
pub enum StorySection {
    /// Introduces characters and setting
    #[strum(serialize = "Exposition")]
    Exposition,
    /// Builds tension toward the climax
    #[strum(serialize = "Rising Action")]
    RisingAction,
    /// The turning point
    #[strum(serialize = "Climax")]
    Climax,
    /// Consequences of the climax
    #[strum(serialize = "Falling Action")]
    FallingAction,
    /// The ending
    #[strum(serialize = "Resolution")]
    Resolution,
}

impl StorySection {
    /// All story sections in order.
    pub fn all() -> Vec<StorySection> {
        StorySection::iter().collect()
    }

    /// The section label as it appears in prompts, log types and JSON.
    pub fn label(&self) -> &'static str {
        match self {
            StorySection::Exposition => "Exposition",
            StorySection::RisingAction => "Rising Action",
            StorySection::Climax => "Climax",
            StorySection::FallingAction => "Falling Action",
            StorySection::Resolution => "Resolution",
        }
    }

    /// True for the first section of the story.
    pub fn is_first(&self) -> bool {
        *self == StorySection::Exposition
    }
}

/// The story mapping: text per section plus the synthesized full story.
///
/// Serialization lists present sections in [`StorySection`] order followed
/// by `"Full Story"` when set; absent entries are omitted.
///
/// # Examples
///
/// ```
/// use prism_core::{StoryDraft, StorySection};
///
/// let mut draft = StoryDraft::new();
/// draft.set(StorySection::Exposition, " It began at dawn. ");
/// draft.set(StorySection::RisingAction, "The storm grew.");
///
/// assert_eq!(
///     draft.previous_sections(StorySection::Climax),
///     vec![StorySection::Exposition, StorySection::RisingAction]
/// );
/// assert_eq!(draft.full_story_text(), "It began at dawn.\n\nThe storm grew.");
///
/// draft.set_full_story("  The whole tale.  ");
/// assert_eq!(draft.full_story_text(), "The whole tale.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct StoryDraft {
    sections: BTreeMap<StorySection, String>,
    full_story: Option<String>,
}

impl StoryDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of a section, if written.
    pub fn get(&self, section: StorySection) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    /// Sets (or replaces) the text of a section.
    pub fn set(&mut self, section: StorySection, text: impl Into<String>) {
        self.sections.insert(section, text.into());
    }

    /// Written sections in order.
    pub fn present_sections(&self) -> Vec<StorySection> {
        self.sections.keys().copied().collect()
    }

    /// Written sections strictly before `section`, in order.
    pub fn previous_sections(&self, section: StorySection) -> Vec<StorySection> {
        self.sections.range(..section).map(|(s, _)| *s).collect()
    }

    /// A draft holding only the sections strictly before `section`.
    pub fn before(&self, section: StorySection) -> StoryDraft {
        StoryDraft {
            sections: self
                .sections
                .range(..section)
                .map(|(s, t)| (*s, t.clone()))
                .collect(),
            full_story: None,
        }
    }

    /// The synthesized full story, if set.
    pub fn full_story(&self) -> Option<&str> {
        self.full_story.as_deref()
    }

    /// Stores the synthesized full story.
    pub fn set_full_story(&mut self, text: impl Into<String>) {
        self.full_story = Some(text.into());
    }

    /// True when neither sections nor a full story are present.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.full_story.is_none()
    }

    /// Final narrative text.
    ///
    /// The trimmed full story if present; otherwise the trimmed sections
    /// joined by a blank line; otherwise the empty string.
    pub fn full_story_text(&self) -> String {
        if let Some(full) = &self.full_story {
            return full.trim().to_string();
        }
        self.sections
            .values()
            .map(|t| t.trim())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Compact JSON rendering used in prompt contexts.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for StoryDraft {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.sections.len() + usize::from(self.full_story.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (section, text) in &self.sections {
            map.serialize_entry(section.label(), text)?;
        }
        if let Some(full) = &self.full_story {
            map.serialize_entry(FULL_STORY_KEY, full)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<String, String>> for StoryDraft {
    type Error = PipelineError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut draft = StoryDraft::new();
        for (key, text) in raw {
            if key == FULL_STORY_KEY {
                draft.set_full_story(text);
                continue;
            }
            let section = StorySection::from_str(&key).map_err(|_| {
                PipelineError::new(PipelineErrorKind::UnknownStorySection(key.clone()))
            })?;
            draft.set(section, text);
        }
        Ok(draft)
    }
}
