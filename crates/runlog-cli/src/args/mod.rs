mod commands;

pub use commands::*;

use crate::types::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "runlog")]
#[command(
    about = "Turn coding-agent transcripts into reports, telemetry and artifact trees",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "warn", global = true, help = "Log verbosity (overridden by RUNLOG_LOG)")]
    pub log_level: LogLevel,

    #[arg(long, global = true, value_name = "PATH", help = "Config file (default: runlog.toml in the project root)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
