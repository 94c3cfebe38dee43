use super::emit;
use crate::presentation::tree::{format_summaries, format_tree};
use crate::types::OutputFormat;
use anyhow::Result;
use chrono::Utc;
use is_terminal::IsTerminal;
use runlog_runtime::{Config, Explorer};
use std::path::{Path, PathBuf};

pub fn handle(
    config: &Config,
    project_root: &Path,
    category: Option<&str>,
    expand: &[PathBuf],
    expand_all: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut explorer = Explorer::from_config(project_root, &config.explorer);

    let Some(category) = category else {
        let summaries = explorer.summaries();
        let payload = match format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&summaries)?),
            OutputFormat::Plain => format_summaries(&summaries),
        };
        return emit(&payload);
    };

    let roots = explorer.open_category(category)?;
    if roots.is_empty() {
        eprintln!(
            "warning: no root of '{}' exists under {}",
            category,
            project_root.display()
        );
    }

    let failures = if expand_all {
        explorer.expand_all()
    } else {
        expand
            .iter()
            .filter_map(|rel| explorer.expand_path(rel).err())
            .collect()
    };
    for failure in &failures {
        eprintln!("warning: {}", failure);
    }

    let nodes = explorer.visible_nodes();
    let payload = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&nodes)?),
        OutputFormat::Plain => {
            let color = std::io::stdout().is_terminal();
            format_tree(&nodes, Utc::now(), color)
        }
    };
    emit(&payload)
}
