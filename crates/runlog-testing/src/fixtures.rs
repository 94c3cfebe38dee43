//! Sample transcripts and builders for synthetic ones.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Sample transcript manager.
pub struct SampleFiles {
    samples_dir: PathBuf,
}

impl Default for SampleFiles {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleFiles {
    /// Samples live in `crates/runlog-parser/tests/samples/`.
    pub fn new() -> Self {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let samples_dir = manifest_dir
            .parent()
            .unwrap()
            .join("runlog-parser/tests/samples");

        Self { samples_dir }
    }

    pub fn path(&self, sample_name: &str) -> PathBuf {
        self.samples_dir.join(sample_name)
    }

    pub fn read(&self, sample_name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.path(sample_name))?)
    }

    pub fn copy_to(&self, sample_name: &str, dest: &Path) -> Result<()> {
        fs::copy(self.path(sample_name), dest)?;
        Ok(())
    }
}

/// A command whose result prints `output_lines` lines.
///
/// Header lines: exec request at 1, command result at 2, then a token
/// snapshot after the output.
pub fn exec_transcript(output_lines: usize) -> String {
    let mut content = String::from(
        "[2024-01-01T00:00:00] exec bash -lc 'find .' in /work\n\
         [2024-01-01T00:00:02] bash -lc 'find .' succeeded in 1,250ms:\n",
    );
    for i in 1..=output_lines {
        content.push_str(&format!("./src/file_{:03}.rs\n", i));
    }
    content.push_str("[2024-01-01T00:00:03] tokens used: 900\n");
    content
}

/// One bracketed token line per `(timestamp, tokens)` pair
pub fn token_transcript(samples: &[(&str, i64)]) -> String {
    samples
        .iter()
        .map(|(ts, tokens)| format!("[{}] tokens used: {}\n", ts, tokens))
        .collect()
}
