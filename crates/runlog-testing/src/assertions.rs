//! Assertions over rendered reports and telemetry JSON.

use anyhow::{Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Parsed `[artifact] <path> (lines:N, sha256:HEX)` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub lines: usize,
    pub sha256: String,
}

/// Find the artifact reference rendered for attribute `label`.
pub fn find_artifact_ref(report: &str, label: &str) -> Result<ArtifactRef> {
    let prefix = format!("{}: [artifact] ", label);
    let reference = report
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .with_context(|| format!("No artifact reference for '{}' in report", label))?;

    let (path, meta) = reference
        .split_once(" (lines:")
        .context("Malformed artifact reference")?;
    let (lines, sha) = meta
        .trim_end_matches(')')
        .split_once(", sha256:")
        .context("Malformed artifact reference metadata")?;

    Ok(ArtifactRef {
        path: PathBuf::from(path),
        lines: lines.parse()?,
        sha256: sha.to_string(),
    })
}

/// Check that the referenced file (relative to `base`) matches its
/// recorded line count and hash.
pub fn assert_artifact_matches(base: &Path, artifact: &ArtifactRef) -> Result<()> {
    let content = std::fs::read(base.join(&artifact.path))
        .with_context(|| format!("Artifact {} not readable", artifact.path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    let digest = format!("{:x}", hasher.finalize());
    if digest != artifact.sha256 {
        anyhow::bail!("Hash mismatch: file {} vs reference {}", digest, artifact.sha256);
    }

    let lines = String::from_utf8_lossy(&content).lines().count();
    if lines != artifact.lines {
        anyhow::bail!("Expected {} lines, file has {}", artifact.lines, lines);
    }
    Ok(())
}

/// Assert the telemetry document has `expected` window snapshots.
pub fn assert_snapshot_count(json: &Value, expected: usize) -> Result<()> {
    let snapshots = json["snapshots"]
        .as_array()
        .context("Expected 'snapshots' array in JSON")?;

    if snapshots.len() != expected {
        anyhow::bail!("Expected {} snapshots, got {}", expected, snapshots.len());
    }
    Ok(())
}
