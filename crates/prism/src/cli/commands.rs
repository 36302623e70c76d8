//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Prism - plan, then write, with calibrated prompt chaining
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(about = "Plan and write stories with the Prism calibration loop", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the discovered ones
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not record stage logs in the database
    #[arg(long, global = true)]
    pub no_db: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Devise and calibrate a story plan
    Plan {
        /// Story identifier [env: STORY_ID, example_id]
        #[arg(long)]
        story_id: Option<String>,

        /// Creative writing task [env: TASK, creative_input]
        #[arg(long)]
        task: Option<String>,

        /// Output directory [env: OUTPUT_DIR, OUTPUT]
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Plan file path; defaults to story_plan.json in the output directory
        #[arg(long)]
        plan_file: Option<PathBuf>,
    },

    /// Write a story from a plan file
    Write {
        /// Story identifier [env: STORY_ID, example_id]
        #[arg(long)]
        story_id: Option<String>,

        /// Plan file [env: PLAN_PATH, plan_path, PLAN]
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Output directory [env: OUTPUT_DIR, OUTPUT]
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Story text path; defaults to story_text.txt in the output directory
        #[arg(long)]
        output_txt: Option<PathBuf>,

        /// Story JSON path; defaults to story_write.json in the output directory
        #[arg(long)]
        output_json: Option<PathBuf>,
    },

    /// Plan, then write, one story
    Run {
        /// Story identifier [env: STORY_ID, example_id]
        #[arg(long)]
        story_id: Option<String>,

        /// Creative writing task [env: TASK, creative_input]
        #[arg(long)]
        task: Option<String>,

        /// Output directory [env: OUTPUT_DIR, OUTPUT]
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Plan and write every entry of a JSON array of {example_id, task}
    Batch {
        /// Batch input file
        #[arg(long)]
        input: PathBuf,

        /// Root output directory; one sub-directory per example [env: OUTPUT_DIR, OUTPUT]
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Show recorded stage logs for a story
    #[cfg(feature = "database")]
    Logs {
        /// Story identifier [env: STORY_ID, example_id]
        #[arg(long)]
        story_id: Option<String>,

        /// Maximum number of rows to display
        #[arg(long, default_value = "20")]
        limit: i64,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
