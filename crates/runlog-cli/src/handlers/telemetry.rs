use super::emit;
use anyhow::{Context, Result};
use runlog_runtime::{Config, TelemetryPipeline};
use std::path::Path;

pub fn handle(
    config: &Config,
    transcript: &Path,
    output: Option<&Path>,
    interval: Option<u64>,
) -> Result<()> {
    let interval = interval
        .map(usize::try_from)
        .transpose()
        .context("--interval is too large")?;

    let outcome = TelemetryPipeline::new(config)
        .run(transcript, output, interval)
        .with_context(|| format!("failed to extract telemetry from {}", transcript.display()))?;

    if output.is_none() {
        emit(&outcome.json)?;
    }

    tracing::info!(
        run_id = %outcome.report.run_id,
        windows = outcome.report.snapshots.len(),
        "telemetry complete"
    );
    Ok(())
}
