use crate::Result;
use crate::config::Config;
use runlog_engine::{Aggregator, build_report, to_json};
use runlog_types::TelemetryReport;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TelemetryOutcome {
    pub report: TelemetryReport,
    /// Pretty JSON with trailing newline
    pub json: String,
}

/// Transcript -> windowed token/latency report
pub struct TelemetryPipeline<'a> {
    config: &'a Config,
}

impl<'a> TelemetryPipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// `interval` overrides the configured window size
    pub fn run(
        &self,
        transcript: &Path,
        output: Option<&Path>,
        interval: Option<usize>,
    ) -> Result<TelemetryOutcome> {
        let aggregator = Aggregator::new(interval.unwrap_or(self.config.telemetry.interval))?
            .with_latency_spike_ms(self.config.telemetry.latency_spike_ms);

        let bytes = fs::read(transcript)?;
        let content = String::from_utf8_lossy(&bytes);
        let run_id = transcript
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = transcript.display().to_string();

        let report = build_report(&run_id, &source, &content, &aggregator);
        let json = to_json(&report)?;

        if let Some(path) = output {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &json)?;
        }

        Ok(TelemetryOutcome { report, json })
    }
}
