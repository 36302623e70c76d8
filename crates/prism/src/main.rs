//! Prism CLI binary.
//!
//! This binary provides command-line access to the Prism pipeline:
//! - Plan a story from a creative writing task
//! - Write a story from a plan file
//! - Run both stages, for one task or a batch
//! - Inspect recorded stage logs

use clap::Parser;
use prism::{ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, RunContext, batch_command, plan_command, run_command, write_command};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_observability(
        ObservabilityConfig::new()
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs),
    )?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Plan {
            story_id,
            task,
            output_dir,
            plan_file,
        } => {
            let ctx = RunContext::prepare(config_path, cli.no_db).await?;
            plan_command(&ctx, story_id, task, output_dir, plan_file).await?;
        }

        Commands::Write {
            story_id,
            plan,
            output_dir,
            output_txt,
            output_json,
        } => {
            let ctx = RunContext::prepare(config_path, cli.no_db).await?;
            write_command(&ctx, story_id, plan, output_dir, output_txt, output_json).await?;
        }

        Commands::Run {
            story_id,
            task,
            output_dir,
        } => {
            let ctx = RunContext::prepare(config_path, cli.no_db).await?;
            run_command(&ctx, story_id, task, output_dir).await?;
        }

        Commands::Batch { input, output_dir } => {
            let ctx = RunContext::prepare(config_path, cli.no_db).await?;
            batch_command(&ctx, &input, output_dir).await?;
        }

        #[cfg(feature = "database")]
        Commands::Logs {
            story_id,
            limit,
            format,
        } => {
            cli::logs_command(config_path, story_id, limit, format).await?;
        }
    }

    Ok(())
}
