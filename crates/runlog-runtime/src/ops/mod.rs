pub mod report;
pub mod telemetry;

pub use report::{ReportOutcome, ReportPipeline};
pub use telemetry::{TelemetryOutcome, TelemetryPipeline};
