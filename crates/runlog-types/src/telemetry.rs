use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point sample extracted from a transcript line.
///
/// Token snapshots leave `latency_ms` at 0 and latency snapshots leave
/// `tokens` at 0; the two kinds travel in separate sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub timestamp: DateTime<Utc>,
    pub tokens: i64,
    pub latency_ms: i64,
    pub line: usize,
}

impl TelemetrySnapshot {
    pub fn tokens(timestamp: DateTime<Utc>, tokens: i64, line: usize) -> Self {
        Self {
            timestamp,
            tokens,
            latency_ms: 0,
            line,
        }
    }

    pub fn latency(timestamp: DateTime<Utc>, latency_ms: i64, line: usize) -> Self {
        Self {
            timestamp,
            tokens: 0,
            latency_ms,
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryAggregate {
    pub start_line: usize,
    pub end_line: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tokens_delta: i64,
    pub tokens_total: i64,
    pub latency_ms_sum: i64,
    pub latency_count: i64,
    pub latency_median: f64,
    pub anomalies: Vec<String>,
}

/// JSON document produced by the telemetry pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReport {
    pub run_id: String,
    pub source: String,
    pub interval: usize,
    pub snapshots: Vec<TelemetryAggregate>,
    /// None when the transcript carried no token counts
    pub final_summary: Option<TelemetryAggregate>,
}
