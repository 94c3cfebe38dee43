use crate::Result;
use runlog_types::{Attribute, Category, FormattedEvent, sanitize_component};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Size limits above which an attribute payload leaves the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineLimits {
    pub max_lines: usize,
    pub max_chars: usize,
}

impl Default for InlineLimits {
    fn default() -> Self {
        Self {
            max_lines: 40,
            max_chars: 4000,
        }
    }
}

impl InlineLimits {
    pub fn exceeded_by(&self, attribute: &Attribute) -> bool {
        attribute.line_count() > self.max_lines || attribute.char_count() > self.max_chars
    }
}

/// Record of one externalized payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    pub lines: usize,
    pub sha256: String,
}

/// Content-addressed sink for oversized attribute payloads.
///
/// The file-name counter lives on the instance, so one store corresponds to
/// one report run.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    link_base: Option<PathBuf>,
    limits: InlineLimits,
    counter: usize,
    written: Vec<StoredArtifact>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            link_base: None,
            limits: InlineLimits::default(),
            counter: 0,
            written: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: InlineLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Directory that reference paths are made relative to
    pub fn with_link_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.link_base = Some(base.into());
        self
    }

    /// Default artifact directory for a report written to `output`:
    /// `<dir>/<stem>.artifacts`.
    pub fn default_dir_for(output: &Path) -> PathBuf {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        output.with_file_name(format!("{}.artifacts", stem))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[StoredArtifact] {
        &self.written
    }

    /// Decide whether an attribute of an event in `category` must be moved
    /// out of the report. Rules are evaluated in order.
    pub fn should_externalize(&self, category: Category, attribute: &Attribute) -> bool {
        let label = attribute.label.to_lowercase();

        if label == "instructions" {
            return false;
        }
        if category == Category::OutputDiffBody {
            return label.contains("diff");
        }
        if label.contains("diff") {
            return true;
        }
        if matches!(label.as_str(), "output" | "stdout" | "stderr") {
            return self.limits.exceeded_by(attribute);
        }
        self.limits.exceeded_by(attribute)
    }

    /// Return a copy of `event` with oversized attributes replaced by
    /// artifact references.
    pub fn process(&mut self, event: &FormattedEvent) -> Result<FormattedEvent> {
        let mut processed = event.clone();
        for attribute in processed.attributes.iter_mut() {
            if attribute.is_empty() || !self.should_externalize(event.category, attribute) {
                continue;
            }
            let reference = self.externalize(event.category, event.line, attribute)?;
            attribute.value = vec![reference];
        }
        Ok(processed)
    }

    /// Write the payload to a new artifact file and return the reference line
    pub fn externalize(
        &mut self,
        category: Category,
        line: usize,
        attribute: &Attribute,
    ) -> Result<String> {
        let mut content = attribute.value.join("\n");
        if !content.ends_with('\n') {
            content.push('\n');
        }

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let sha256 = format!("{:x}", hasher.finalize());

        self.counter += 1;
        let file_name = format!(
            "{:04}_{}_{}_{}.txt",
            self.counter,
            sanitize_component(category.as_str()),
            sanitize_component(&attribute.label),
            line
        );

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, &content)?;

        let lines = attribute.line_count();
        let shown = self.display_path(&path);
        tracing::debug!(path = %shown, lines, sha256 = &sha256[..12], "externalized attribute");

        self.written.push(StoredArtifact {
            path,
            lines,
            sha256: sha256.clone(),
        });

        Ok(format!("[artifact] {} (lines:{}, sha256:{})", shown, lines, sha256))
    }

    fn display_path(&self, path: &Path) -> String {
        let relative = self
            .link_base
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_threshold_boundary_on_lines() {
        let store = ArtifactStore::new("unused");
        let at_limit = Attribute::new("output", lines(40));
        let over_limit = Attribute::new("output", lines(41));

        assert!(!store.should_externalize(Category::ToolExecResult, &at_limit));
        assert!(store.should_externalize(Category::ToolExecResult, &over_limit));
    }

    #[test]
    fn test_threshold_boundary_on_chars() {
        let store = ArtifactStore::new("unused");
        let at_limit = Attribute::single("notes", "x".repeat(4000));
        let over_limit = Attribute::single("notes", "x".repeat(4001));

        assert!(!store.should_externalize(Category::CognitionStart, &at_limit));
        assert!(store.should_externalize(Category::CognitionStart, &over_limit));
    }

    #[test]
    fn test_instructions_never_externalized() {
        let store = ArtifactStore::new("unused");
        let huge = Attribute::new("Instructions", lines(500));
        assert!(!store.should_externalize(Category::ContextInstructions, &huge));
    }

    #[test]
    fn test_diff_rules() {
        let store = ArtifactStore::new("unused");
        let small_diff = Attribute::single("diff", "+one");
        let big_other = Attribute::new("notes", lines(100));

        // Diff bodies: only diff-labelled attributes leave, regardless of size
        assert!(store.should_externalize(Category::OutputDiffBody, &small_diff));
        assert!(!store.should_externalize(Category::OutputDiffBody, &big_other));

        // Elsewhere a diff label always externalizes
        let patch_diff = Attribute::single("unified_diff", "+x");
        assert!(store.should_externalize(Category::ToolPatchResult, &patch_diff));
    }

    #[test]
    fn test_custom_limits() {
        let store = ArtifactStore::new("unused").with_limits(InlineLimits {
            max_lines: 2,
            max_chars: 10_000,
        });
        assert!(store.should_externalize(Category::LogRaw, &Attribute::new("message", lines(3))));
    }

    #[test]
    fn test_externalize_writes_content_addressed_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("run.artifacts");
        let mut store = ArtifactStore::new(&dir).with_link_base(temp_dir.path());

        let attribute = Attribute::new("output", lines(45));
        let reference = store
            .externalize(Category::ToolExecResult, 23, &attribute)
            .unwrap();

        let written = &store.written()[0];
        assert_eq!(
            written.path,
            dir.join("0001_tool-exec_result_output_23.txt")
        );
        assert_eq!(written.lines, 45);

        let content = fs::read_to_string(&written.path).unwrap();
        assert_eq!(content.lines().count(), 45);
        assert!(content.ends_with("line 45\n"));

        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        assert_eq!(digest, written.sha256);
        assert_eq!(
            reference,
            format!(
                "[artifact] run.artifacts/0001_tool-exec_result_output_23.txt (lines:45, sha256:{})",
                digest
            )
        );
    }

    #[test]
    fn test_counter_is_per_store() {
        let temp_dir = TempDir::new().unwrap();
        let attribute = Attribute::single("diff", "+x");

        let mut first = ArtifactStore::new(temp_dir.path().join("a"));
        first.externalize(Category::OutputDiffBody, 1, &attribute).unwrap();
        first.externalize(Category::OutputDiffBody, 2, &attribute).unwrap();

        let mut second = ArtifactStore::new(temp_dir.path().join("b"));
        second.externalize(Category::OutputDiffBody, 3, &attribute).unwrap();

        assert!(first.written()[1].path.ends_with("0002_output-diff_body_diff_2.txt"));
        assert!(second.written()[0].path.ends_with("0001_output-diff_body_diff_3.txt"));
    }

    #[test]
    fn test_process_replaces_only_oversized_attributes() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ArtifactStore::new(temp_dir.path());

        let event = FormattedEvent::new("Command Result", Category::ToolExecResult, 5)
            .with(Attribute::single("status", "succeeded"))
            .with(Attribute::new("output", lines(41)));

        let processed = store.process(&event).unwrap();
        assert_eq!(processed.attributes[0].value, vec!["succeeded"]);
        assert_eq!(processed.attributes[1].value.len(), 1);
        assert!(processed.attributes[1].value[0].starts_with("[artifact] "));
        assert_eq!(store.written().len(), 1);
    }

    #[test]
    fn test_default_dir_for_output() {
        assert_eq!(
            ArtifactStore::default_dir_for(Path::new("/tmp/out/report.txt")),
            PathBuf::from("/tmp/out/report.artifacts")
        );
    }
}
