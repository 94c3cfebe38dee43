use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted taxonomy of classified transcript events.
///
/// The string form (`as_str`) is what appears in rendered reports and
/// artifact file names, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "context.metadata")]
    ContextMetadata,
    #[serde(rename = "context.init")]
    ContextInit,
    #[serde(rename = "context.instructions")]
    ContextInstructions,
    #[serde(rename = "context.manifest")]
    ContextManifest,
    #[serde(rename = "cognition.start")]
    CognitionStart,
    #[serde(rename = "cognition.stage")]
    CognitionStage,
    #[serde(rename = "tool.exec_request")]
    ToolExecRequest,
    #[serde(rename = "tool.exec_result")]
    ToolExecResult,
    #[serde(rename = "tool.patch_result")]
    ToolPatchResult,
    #[serde(rename = "telemetry.tokens")]
    TelemetryTokens,
    #[serde(rename = "output.diff_body")]
    OutputDiffBody,
    #[serde(rename = "log.raw")]
    LogRaw,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::ContextMetadata,
        Category::ContextInit,
        Category::ContextInstructions,
        Category::ContextManifest,
        Category::CognitionStart,
        Category::CognitionStage,
        Category::ToolExecRequest,
        Category::ToolExecResult,
        Category::ToolPatchResult,
        Category::TelemetryTokens,
        Category::OutputDiffBody,
        Category::LogRaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ContextMetadata => "context.metadata",
            Category::ContextInit => "context.init",
            Category::ContextInstructions => "context.instructions",
            Category::ContextManifest => "context.manifest",
            Category::CognitionStart => "cognition.start",
            Category::CognitionStage => "cognition.stage",
            Category::ToolExecRequest => "tool.exec_request",
            Category::ToolExecResult => "tool.exec_result",
            Category::ToolPatchResult => "tool.patch_result",
            Category::TelemetryTokens => "telemetry.tokens",
            Category::OutputDiffBody => "output.diff_body",
            Category::LogRaw => "log.raw",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
