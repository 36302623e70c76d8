//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the prism binary.

mod commands;
#[cfg(feature = "database")]
mod logs;
mod run;

pub use commands::{Cli, Commands, OutputFormat};
#[cfg(feature = "database")]
pub use logs::logs_command;
pub use run::{RunContext, batch_command, plan_command, run_command, write_command};
