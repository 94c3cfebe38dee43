use crate::types::OutputFormat;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Render a transcript as a plain-text report")]
    Report {
        transcript: PathBuf,

        #[arg(short, long, value_name = "PATH", help = "Write the report here instead of stdout")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_name = "DIR",
            help = "Where oversized payloads go (default: <output stem>.artifacts)"
        )]
        artifact_dir: Option<PathBuf>,
    },

    #[command(about = "Extract windowed token and latency telemetry as JSON")]
    Telemetry {
        transcript: PathBuf,

        #[arg(short, long, value_name = "PATH", help = "Write the JSON here instead of stdout")]
        output: Option<PathBuf>,

        #[arg(
            long,
            value_name = "N",
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Token snapshots per window (default from config: 5)"
        )]
        interval: Option<u64>,
    },

    #[command(about = "Summarize artifact categories or browse one as a tree")]
    Tree {
        #[arg(help = "Category to browse; omit for a one-line summary of each")]
        category: Option<String>,

        #[arg(
            long = "expand",
            value_name = "REL",
            help = "Expand this path (relative to the project root) and its ancestors"
        )]
        expand: Vec<PathBuf>,

        #[arg(long, conflicts_with = "expand", help = "Expand every directory")]
        expand_all: bool,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}
