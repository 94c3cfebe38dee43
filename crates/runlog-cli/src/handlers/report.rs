use super::emit;
use anyhow::{Context, Result};
use runlog_runtime::{Config, ReportPipeline};
use std::path::Path;

pub fn handle(
    config: &Config,
    transcript: &Path,
    output: Option<&Path>,
    artifact_dir: Option<&Path>,
) -> Result<()> {
    let outcome = ReportPipeline::new(config)
        .run(transcript, output, artifact_dir)
        .with_context(|| format!("failed to render report for {}", transcript.display()))?;

    if output.is_none() {
        emit(&outcome.text)?;
    }

    tracing::info!(
        events = outcome.events,
        artifacts = outcome.artifacts_written.len(),
        artifact_dir = %outcome.artifact_dir.display(),
        "report complete"
    );
    Ok(())
}
