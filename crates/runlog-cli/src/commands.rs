use super::args::{Cli, Commands};
use super::handlers;
use super::logging;
use anyhow::{Context, Result};
use runlog_runtime::{Config, discover_project_root};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let project_root = discover_project_root(cli.project_root.as_deref())?;
    let config = Config::resolve(cli.config.as_deref(), &project_root)
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Report {
            transcript,
            output,
            artifact_dir,
        } => handlers::report::handle(
            &config,
            &transcript,
            output.as_deref(),
            artifact_dir.as_deref(),
        ),

        Commands::Telemetry {
            transcript,
            output,
            interval,
        } => handlers::telemetry::handle(&config, &transcript, output.as_deref(), interval),

        Commands::Tree {
            category,
            expand,
            expand_all,
            format,
        } => handlers::tree::handle(
            &config,
            &project_root,
            category.as_deref(),
            &expand,
            expand_all,
            format,
        ),
    }
}
