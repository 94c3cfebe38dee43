use crate::{Error, Result};
use runlog_types::{TelemetryAggregate, TelemetrySnapshot};

pub const DEFAULT_INTERVAL: usize = 5;
pub const DEFAULT_LATENCY_SPIKE_MS: i64 = 60_000;

/// Windows token snapshots into fixed-size buckets.
///
/// Token counts are expected to be non-decreasing; a decrease inside a
/// window is only flagged as an anomaly, never used to reset a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
    interval: usize,
    latency_spike_ms: i64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            latency_spike_ms: DEFAULT_LATENCY_SPIKE_MS,
        }
    }
}

impl Aggregator {
    pub fn new(interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(Error::InvalidInput(
                "aggregation interval must be positive".to_string(),
            ));
        }
        Ok(Self {
            interval,
            ..Self::default()
        })
    }

    pub fn with_latency_spike_ms(mut self, threshold: i64) -> Self {
        self.latency_spike_ms = threshold;
        self
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Sort, dedupe and window the samples.
    ///
    /// Returns the per-window aggregates and the whole-run aggregate (None
    /// when there are no token samples).
    pub fn aggregate(
        &self,
        mut tokens: Vec<TelemetrySnapshot>,
        mut durations: Vec<TelemetrySnapshot>,
    ) -> (Vec<TelemetryAggregate>, Option<TelemetryAggregate>) {
        // Stable sorts: equal timestamps keep transcript order
        tokens.sort_by_key(|s| s.timestamp);
        durations.sort_by_key(|s| s.timestamp);

        let tokens = dedupe_tokens(&tokens);
        let windows = tokens
            .chunks(self.interval)
            .filter_map(|window| self.aggregate_window(window, &durations))
            .collect();
        let overall = self.aggregate_window(&tokens, &durations);

        (windows, overall)
    }

    fn aggregate_window(
        &self,
        window: &[TelemetrySnapshot],
        durations: &[TelemetrySnapshot],
    ) -> Option<TelemetryAggregate> {
        let (first, last) = (window.first()?, window.last()?);

        let latencies: Vec<i64> = durations
            .iter()
            .filter(|d| d.timestamp >= first.timestamp && d.timestamp <= last.timestamp)
            .map(|d| d.latency_ms)
            .collect();

        let tokens_delta = last.tokens - first.tokens;
        let mut anomalies = Vec::new();
        if tokens_delta < 0 {
            anomalies.push(format!("negative token delta ({})", tokens_delta));
        }
        if let Some(spike) = latencies.iter().find(|&&ms| ms > self.latency_spike_ms) {
            anomalies.push(format!("latency spike {}ms", spike));
        }

        Some(TelemetryAggregate {
            start_line: first.line,
            end_line: last.line,
            start_time: first.timestamp,
            end_time: last.timestamp,
            tokens_delta,
            tokens_total: last.tokens,
            latency_ms_sum: latencies.iter().fold(0i64, |acc, ms| acc.saturating_add(*ms)),
            latency_count: latencies.len() as i64,
            latency_median: median(&latencies),
            anomalies,
        })
    }
}

/// Collapse runs of consecutive identical token counts, keeping the first
pub fn dedupe_tokens(snapshots: &[TelemetrySnapshot]) -> Vec<TelemetrySnapshot> {
    if snapshots.len() <= 1 {
        return snapshots.to_vec();
    }

    let mut deduped: Vec<TelemetrySnapshot> = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        if deduped.last().is_some_and(|prev| prev.tokens == snapshot.tokens) {
            continue;
        }
        deduped.push(*snapshot);
    }
    deduped
}

/// Median of the values; 0.0 for an empty slice
pub fn median(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}
