//! Scripted driver answering each stage by its prompt.

use async_trait::async_trait;
use prism_core::{GenerateRequest, GenerateResponse, PlanSection, StorySection};
use prism_error::{ModelsError, ModelsErrorKind, PrismResult};
use prism_interface::PrismDriver;
use prism_pipeline::{PLAN_RETRY_SUFFIX, SECTION_RETRY_SUFFIX};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&str) -> Result<String, ModelsErrorKind> + Send + Sync;

/// Mock driver whose replies are computed from the user message.
pub struct ScriptedDriver {
    responder: Box<Responder>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDriver {
    /// Answer every request with `responder(user_text)`.
    pub fn new(
        responder: impl Fn(&str) -> Result<String, ModelsErrorKind> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer from a [`StoryScript`].
    pub fn scripted(script: StoryScript) -> Self {
        Self::new(move |text| Ok(script.respond(text)))
    }

    /// Fail every request.
    pub fn failing() -> Self {
        Self::new(|_| Err(ModelsErrorKind::Http("connection refused".to_string())))
    }

    /// User messages received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrismDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> PrismResult<GenerateResponse> {
        let user_text = req
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(user_text.clone());
        match (self.responder)(&user_text) {
            Ok(text) => Ok(GenerateResponse::text(text)),
            Err(kind) => Err(ModelsError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Canned stage outputs keyed by prompt prefix.
#[derive(Debug, Clone)]
pub struct StoryScript {
    /// Spectral Analysis reply
    pub critique: String,
    /// Focal Decision reply
    pub decision: String,
    /// Whether the first Beam Reforging reply is well formed
    pub reforge_parses: bool,
    /// Whether the format-fix retry reply is well formed
    pub retry_parses: bool,
}

impl Default for StoryScript {
    fn default() -> Self {
        Self {
            critique: "Grade: A\n- Keep going.".to_string(),
            decision: "Category: 'No Issue (all A)'\nConfidence: High".to_string(),
            reforge_parses: true,
            retry_parses: true,
        }
    }
}

impl StoryScript {
    /// A script whose decision calls for refinement.
    pub fn refining() -> Self {
        Self {
            critique: "Grade: B\n- Deepen the stakes.".to_string(),
            decision: "Category: 'Major (majority B)'\nTargeted fixes: sharpen the conflict"
                .to_string(),
            ..Self::default()
        }
    }

    fn respond(&self, text: &str) -> String {
        if text.starts_with("Perform Spectral Analysis") {
            return self.critique.clone();
        }
        if text.starts_with("Conduct a Focal Decision") {
            return self.decision.clone();
        }
        if text.starts_with("Perform Beam Reforging") {
            let is_retry =
                text.contains(PLAN_RETRY_SUFFIX) || text.contains(SECTION_RETRY_SUFFIX);
            let parses = if is_retry {
                self.retry_parses
            } else {
                self.reforge_parses
            };
            if !parses {
                return "I have some thoughts but no particular format.".to_string();
            }
            return reforged(text);
        }
        if text.starts_with("Given all refined sections") {
            return "The whole tale.".to_string();
        }
        if let Some(section) = woven_section(text) {
            return format!("Woven {}.", section.label());
        }
        if let Some(section) = devised_section(text) {
            return format!("Devised {}.", section.label());
        }
        "Summary.".to_string()
    }
}

fn reforged(prompt: &str) -> String {
    for section in StorySection::all() {
        if prompt.contains(&format!("refine the {}.", section.label())) {
            return format!("{}: Refined {}.", section.label(), section.label());
        }
    }
    PlanSection::all()
        .iter()
        .map(|s| format!("{}: Refined {}.", s.label(), s.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn woven_section(prompt: &str) -> Option<StorySection> {
    StorySection::all()
        .into_iter()
        .find(|s| prompt.contains(&format!("continue the story by writing the {} part", s.label())))
}

fn devised_section(prompt: &str) -> Option<PlanSection> {
    if !prompt.starts_with("Given ") {
        return None;
    }
    let first_line = prompt.lines().next().unwrap_or_default();
    if first_line.contains("describe the central conflict") {
        Some(PlanSection::CentralConflict)
    } else if first_line.contains("describe the characters") {
        Some(PlanSection::CharacterDescriptions)
    } else if first_line.contains("describe the setting") {
        Some(PlanSection::Setting)
    } else if first_line.contains("describe the key plot points") {
        Some(PlanSection::KeyPlotPoints)
    } else {
        None
    }
}
