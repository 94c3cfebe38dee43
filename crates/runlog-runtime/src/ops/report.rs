use crate::Result;
use crate::config::Config;
use crate::path::{absolutize, display_relative};
use runlog_engine::{ArtifactStore, ReportRenderer, StoredArtifact};
use runlog_parser::{classify_all, scan_file};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub text: String,
    /// Number of rendered event blocks
    pub events: usize,
    pub artifacts_written: Vec<StoredArtifact>,
    /// Where artifacts go; only created if something was externalized
    pub artifact_dir: PathBuf,
}

/// Transcript -> plain-text report, externalizing oversized payloads
pub struct ReportPipeline<'a> {
    config: &'a Config,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render `transcript`. The report is written to `output` when given;
    /// the text is returned either way.
    pub fn run(
        &self,
        transcript: &Path,
        output: Option<&Path>,
        artifact_dir: Option<&Path>,
    ) -> Result<ReportOutcome> {
        let cwd = std::env::current_dir()?;

        let raw_events = scan_file(transcript)?;
        let events = classify_all(&raw_events);

        let artifact_dir = match artifact_dir {
            Some(dir) => absolutize(dir, &cwd),
            None => absolutize(
                &ArtifactStore::default_dir_for(output.unwrap_or(transcript)),
                &cwd,
            ),
        };
        let link_base = output
            .map(|path| absolutize(path, &cwd))
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.clone());

        let mut store = ArtifactStore::new(&artifact_dir)
            .with_limits(self.config.report.limits())
            .with_link_base(link_base);

        let source_label = display_relative(transcript, &cwd);
        let text = ReportRenderer::new(source_label).render(&events, &mut store)?;

        if let Some(path) = output {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &text)?;
        }

        Ok(ReportOutcome {
            text,
            events: events.len(),
            artifacts_written: store.written().to_vec(),
            artifact_dir,
        })
    }
}
