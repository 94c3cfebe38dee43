use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Explorer node identifier: `<category>:<normalized relative path>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn new(category: &str, rel: &str) -> Self {
        Self(format!("{}:{}", category, rel))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Category portion of the key
    pub fn category(&self) -> &str {
        self.0.split_once(':').map(|(c, _)| c).unwrap_or(&self.0)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One file or directory under a configured artifact root.
///
/// `loaded` means the children (if any) are cached; `expanded` implies
/// `loaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNode {
    pub key: NodeKey,
    /// Path relative to the project root
    pub rel: PathBuf,
    pub name: String,
    pub level: usize,
    pub is_dir: bool,
    pub expanded: bool,
    pub loaded: bool,
    pub parent: Option<NodeKey>,
    pub has_children: bool,
    pub size: u64,
    pub mod_time: Option<DateTime<Utc>>,
}
