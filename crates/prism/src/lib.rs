//! Prism: a prompt-chaining story pipeline.
//!
//! Prism turns a creative writing task into a story in two stages. The plan
//! stage devises the central conflict, characters, setting and key plot
//! points; the write stage weaves five story sections and synthesizes the
//! complete narrative. Every draft passes through a calibration loop of
//! Beam Focusing, Spectrum Conference, Spectral Analysis, Focal Decision and
//! Beam Reforging.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use prism::{PrismConfig, build_agent, build_driver, generate_plan, generate_story};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PrismConfig::load(None)?;
//!     let driver = build_driver(&config.model, config.retry)?;
//!     let agent = build_agent(driver, &config.model, None);
//!
//!     let task = "Write a story about a lighthouse keeper.";
//!     let plan = generate_plan(&agent, "ex_1", task).await.into_plan();
//!     let story = generate_story(&agent, "ex_1", &plan, task).await;
//!     println!("{}", story.draft().full_story_text());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` (default) - PostgreSQL stage logs and the `logs` subcommand
//!
//! # Architecture
//!
//! - `prism_error` - Error types
//! - `prism_core` - Plan, story, critique and log data types
//! - `prism_interface` - `PrismDriver` and `LogSink` traits
//! - `prism_models` - OpenAI-compatible chat client and the Zhipu driver
//! - `prism_pipeline` - Prompts, extraction, calibration, planner and writer
//! - `prism_database` - PostgreSQL stage log sink
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;
mod settings;
mod setup;

pub use config::{DatabaseConfig, ModelConfig, PrismConfig};
pub use observability::{ObservabilityConfig, init_observability};
pub use settings::{
    OUTPUT_DIR_VARS, PLAN_PATH_VARS, STORY_ID_VARS, TASK_VARS, process_env, resolve_output_dir,
    resolve_plan_path, resolve_story_id, resolve_task,
};
#[cfg(feature = "database")]
pub use setup::connect_log_store;
pub use setup::{OPENAI_ENDPOINT, build_agent, build_driver};

pub use prism_core::*;
pub use prism_error::*;
pub use prism_interface::*;
pub use prism_models::*;
pub use prism_pipeline::*;

#[cfg(feature = "database")]
pub use prism_database::*;
