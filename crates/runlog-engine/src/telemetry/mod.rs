//! Token and latency telemetry pulled straight from transcript text.
//!
//! This pass is independent of scanning/classification: it looks for a
//! handful of targeted patterns line by line, then windows the token
//! samples and attaches the latency samples that fall inside each window.

mod aggregate;
mod extract;

pub use aggregate::{
    Aggregator, DEFAULT_INTERVAL, DEFAULT_LATENCY_SPIKE_MS, dedupe_tokens, median,
};
pub use extract::{Extraction, extract};

use crate::Result;
use runlog_types::TelemetryReport;

/// Extract and aggregate telemetry for one transcript
pub fn build_report(
    run_id: &str,
    source: &str,
    content: &str,
    aggregator: &Aggregator,
) -> TelemetryReport {
    let extraction = extract(content);
    let (snapshots, final_summary) = aggregator.aggregate(extraction.tokens, extraction.durations);

    tracing::debug!(
        windows = snapshots.len(),
        interval = aggregator.interval(),
        "aggregated telemetry"
    );

    TelemetryReport {
        run_id: run_id.to_string(),
        source: source.to_string(),
        interval: aggregator.interval(),
        snapshots,
        final_summary,
    }
}

/// Pretty JSON with a trailing newline
pub fn to_json(report: &TelemetryReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
