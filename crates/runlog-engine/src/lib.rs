// Engine module - report rendering and telemetry analysis
// This layer sits between classified events (parser) and the runtime pipelines

pub mod error;
pub mod render;
pub mod store;
pub mod telemetry;

pub use error::{Error, Result};
pub use render::ReportRenderer;
pub use store::{ArtifactStore, InlineLimits, StoredArtifact};
pub use telemetry::{
    Aggregator, DEFAULT_INTERVAL, DEFAULT_LATENCY_SPIKE_MS, Extraction, build_report,
    dedupe_tokens, extract, median, to_json,
};
