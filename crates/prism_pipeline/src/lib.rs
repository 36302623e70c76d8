//! Prism story pipeline orchestration.
//!
//! The pipeline turns a creative writing task into a story in two stages:
//!
//! - **Plan**: devise the central conflict, characters, setting and key plot
//!   points, then calibrate the plan as a whole.
//! - **Write**: weave the five story sections in order, calibrating each one,
//!   then synthesize the complete narrative.
//!
//! Every model call goes through a [`StageAgent`], which never fails: a
//! provider error becomes the stage output and the pipeline moves on.
//!
//! # Example
//!
//! ```rust,ignore
//! use prism_pipeline::{StageAgent, generate_plan, generate_story};
//!
//! let agent = StageAgent::new(driver);
//! let plan = generate_plan(&agent, "ex_1", task).await.into_plan();
//! let story = generate_story(&agent, "ex_1", &plan, task).await;
//! println!("{}", story.draft().full_story_text());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod artifacts;
mod calibration;
mod extraction;
mod planner;
mod prompts;
mod run;
mod writer;

pub use agent::{LLM_ERROR_PREFIX, StageAgent};
pub use artifacts::{
    GENERATED_AT_FORMAT, LoadedPlan, PlanArtifact, WriteArtifact, load_plan, load_plan_or_empty,
    save_plan, save_story, write_json, write_text,
};
pub use calibration::{
    CalibrationReport, CalibrationScope, CalibrationTarget, FocalDecision, PlanTarget,
    RefinementOutcome, SectionTarget, calibrate,
};
pub use extraction::{
    parse_focal_category, parse_grade, parse_labeled_section, parse_plan_sections,
    parse_scratchpad, parse_targeted_fixes,
};
pub use planner::{PlanOutcome, devise_log_type, generate_plan};
pub use prompts::*;
pub use run::{
    BatchItem, DEFAULT_STORY_ID, OutputLayout, PLAN_FILE_NAME, WRITE_JSON_FILE_NAME,
    WRITE_TEXT_FILE_NAME, load_batch, run_batch, run_plan, run_story, run_write,
    run_write_from_file,
};
pub use writer::{StoryOutcome, generate_story};
