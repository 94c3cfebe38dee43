pub mod config;
pub mod error;
pub mod explorer;
pub mod ops;
pub mod path;

pub use config::{CategoryConfig, Config, ExplorerConfig, ReportConfig, TelemetryConfig};
pub use error::{Error, Result};
pub use explorer::{CategorySummary, ExpandError, Explorer};
pub use ops::{ReportOutcome, ReportPipeline, TelemetryOutcome, TelemetryPipeline};
pub use path::{discover_project_root, expand_tilde};
