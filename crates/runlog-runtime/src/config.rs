use crate::path::expand_tilde;
use crate::{Error, Result};
use runlog_engine::{DEFAULT_INTERVAL, DEFAULT_LATENCY_SPIKE_MS, InlineLimits};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG_FILE: &str = "runlog.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub max_inline_lines: usize,
    pub max_inline_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let limits = InlineLimits::default();
        Self {
            max_inline_lines: limits.max_lines,
            max_inline_chars: limits.max_chars,
        }
    }
}

impl ReportConfig {
    pub fn limits(&self) -> InlineLimits {
        InlineLimits {
            max_lines: self.max_inline_lines,
            max_chars: self.max_inline_chars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub interval: usize,
    pub latency_spike_ms: i64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            latency_spike_ms: DEFAULT_LATENCY_SPIKE_MS,
        }
    }
}

/// A named group of artifact roots, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

impl CategoryConfig {
    pub fn new(name: &str, label: &str, roots: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            roots: roots.iter().map(PathBuf::from).collect(),
        }
    }

    /// Label, or the name when no label is configured
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub categories: Vec<CategoryConfig>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryConfig::new("staging", "Staging artifacts", &[".staging", "staging"]),
                CategoryConfig::new("apps", "Applications", &["apps"]),
            ],
        }
    }
}

impl ExplorerConfig {
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub telemetry: TelemetryConfig,
    pub explorer: ExplorerConfig,
}

impl Config {
    /// Load the first existing config file, falling back to defaults:
    /// 1. explicit path (--config flag)
    /// 2. RUNLOG_CONFIG environment variable (with tilde expansion)
    /// 3. `<project_root>/runlog.toml`
    /// 4. `<system config dir>/runlog/config.toml`
    pub fn resolve(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let env_path = std::env::var("RUNLOG_CONFIG").ok();
        let candidates = candidate_paths(explicit_path, env_path.as_deref(), project_root);

        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load_from(path)
            }
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.telemetry.interval == 0 {
            return Err(Error::Config(
                "telemetry.interval must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.explorer.categories {
            if category.name.trim().is_empty() {
                return Err(Error::Config(
                    "explorer category name must not be empty".to_string(),
                ));
            }
            if category.name.contains(':') {
                return Err(Error::Config(format!(
                    "explorer category name '{}' must not contain ':'",
                    category.name
                )));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate explorer category '{}'",
                    category.name
                )));
            }
        }
        Ok(())
    }
}

fn candidate_paths(
    explicit_path: Option<&Path>,
    env_path: Option<&str>,
    project_root: &Path,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit_path {
        candidates.push(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        candidates.push(expand_tilde(path));
    }
    candidates.push(project_root.join(PROJECT_CONFIG_FILE));
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("runlog").join("config.toml"));
    }
    candidates
}
