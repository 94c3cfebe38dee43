//! Lazily loaded tree over the configured artifact roots.
//!
//! Nodes live in a flat map keyed by [`NodeKey`]; parent and child links
//! are keys, never references. A directory is read the first time it is
//! expanded and its children stay cached for the lifetime of the
//! `Explorer`, so collapsing and re-expanding never touches the disk.
//!
//! Node state moves `unloaded -> loaded(collapsed) <-> loaded(expanded)`.
//! A directory that cannot be read is still marked loaded (with no
//! children) so that repeated expands do not retry it.

mod fs;
mod time;

pub use time::{format_relative_time, format_relative_time_at};

use crate::config::{CategoryConfig, ExplorerConfig};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use fs::{EntryInfo, read_children};
use runlog_types::{ArtifactNode, NodeKey, normalize_rel_path};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Deepest level `expand_all` descends to
pub const MAX_EXPAND_DEPTH: usize = 32;
/// Upper bound on directories `expand_all` will read in one call
pub const MAX_EXPAND_DIRS: usize = 10_000;

/// Failure to expand a single node. The explorer stays usable.
#[derive(Debug)]
pub enum ExpandError {
    UnknownNode(NodeKey),
    NotADirectory(NodeKey),
    /// No opened root contains the requested path
    OutsideRoots(String),
    ReadDir {
        key: NodeKey,
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::UnknownNode(key) => write!(f, "unknown node '{}'", key),
            ExpandError::NotADirectory(key) => write!(f, "'{}' is not a directory", key),
            ExpandError::OutsideRoots(rel) => {
                write!(f, "'{}' is not under any opened artifact root", rel)
            }
            ExpandError::ReadDir { path, source, .. } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExpandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpandError::ReadDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One line of the category overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub label: String,
    pub summary: String,
}

#[derive(Debug)]
pub struct Explorer {
    project_root: PathBuf,
    categories: Vec<CategoryConfig>,
    nodes: HashMap<NodeKey, ArtifactNode>,
    children: HashMap<NodeKey, Vec<NodeKey>>,
    roots: Vec<NodeKey>,
}

impl Explorer {
    pub fn new(project_root: impl Into<PathBuf>, categories: Vec<CategoryConfig>) -> Self {
        Self {
            project_root: project_root.into(),
            categories,
            nodes: HashMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
        }
    }

    pub fn from_config(project_root: impl Into<PathBuf>, config: &ExplorerConfig) -> Self {
        Self::new(project_root, config.categories.clone())
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn categories(&self) -> &[CategoryConfig] {
        &self.categories
    }

    fn category(&self, name: &str) -> Result<&CategoryConfig> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category '{}'", name)))
    }

    /// One-line state of a category's roots: `Directory missing`, `Empty`,
    /// or `<N> items • updated <age>`.
    pub fn summarize(&self, name: &str) -> Result<String> {
        let category = self.category(name)?;

        let mut any_present = false;
        let mut count = 0usize;
        let mut latest: Option<DateTime<Utc>> = None;

        for root in &category.roots {
            let dir = self.project_root.join(root);
            if !dir.is_dir() {
                continue;
            }
            any_present = true;
            if self.enclosing_root(category, &normalize_rel_path(root)).is_some() {
                continue;
            }

            match read_children(&dir) {
                Ok(entries) => {
                    count += entries.len();
                    latest = entries.iter().filter_map(|e| e.mod_time).chain(latest).max();
                }
                Err(err) => {
                    tracing::warn!(path = %dir.display(), %err, "cannot read artifact root");
                }
            }
        }

        let summary = if !any_present {
            "Directory missing".to_string()
        } else if count == 0 {
            "Empty".to_string()
        } else {
            match latest {
                Some(ts) => format!("{} items • updated {}", count, format_relative_time(ts)),
                None => format!("{} items", count),
            }
        };
        Ok(summary)
    }

    /// Another existing root of `category` that contains `rel`
    fn enclosing_root(&self, category: &CategoryConfig, rel: &str) -> Option<String> {
        category
            .roots
            .iter()
            .map(|root| normalize_rel_path(root))
            .filter(|outer| outer != rel && is_nested(rel, outer))
            .find(|outer| self.project_root.join(outer).exists())
    }

    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|category| CategorySummary {
                name: category.name.clone(),
                label: category.display_label().to_string(),
                summary: self
                    .summarize(&category.name)
                    .unwrap_or_else(|e| e.to_string()),
            })
            .collect()
    }

    /// Add the existing roots of `name` as top-level nodes and return their
    /// keys. Missing roots are skipped, as are roots nested inside another
    /// existing root of the category; opening twice is a no-op.
    pub fn open_category(&mut self, name: &str) -> Result<Vec<NodeKey>> {
        let category = self.category(name)?.clone();
        let mut opened = Vec::new();

        for root in &category.roots {
            let rel = normalize_rel_path(root);
            let key = NodeKey::new(&category.name, &rel);
            if self.nodes.contains_key(&key) {
                if self.roots.contains(&key) && !opened.contains(&key) {
                    opened.push(key);
                }
                continue;
            }

            let path = self.project_root.join(root);
            if !path.exists() {
                tracing::debug!(category = name, root = %rel, "artifact root missing");
                continue;
            }
            if let Some(outer) = self.enclosing_root(&category, &rel) {
                tracing::debug!(category = name, root = %rel, %outer, "root nested in another root");
                continue;
            }

            let info = EntryInfo::stat(&path);
            let node = ArtifactNode {
                key: key.clone(),
                rel: PathBuf::from(&rel),
                name: rel.clone(),
                level: 0,
                is_dir: info.is_dir,
                expanded: false,
                loaded: false,
                parent: None,
                has_children: info.is_dir,
                size: info.size,
                mod_time: info.mod_time,
            };
            self.nodes.insert(key.clone(), node);
            self.roots.push(key.clone());
            opened.push(key);
        }
        Ok(opened)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&ArtifactNode> {
        self.nodes.get(key)
    }

    /// Cached children of `key`; empty when unloaded
    pub fn children(&self, key: &NodeKey) -> &[NodeKey] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn expand(&mut self, key: &NodeKey) -> std::result::Result<(), ExpandError> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| ExpandError::UnknownNode(key.clone()))?;
        if !node.is_dir {
            return Err(ExpandError::NotADirectory(key.clone()));
        }
        if node.loaded {
            self.set_expanded(key, true);
            return Ok(());
        }

        let rel = node.rel.clone();
        let level = node.level;
        let dir = self.project_root.join(&rel);

        let entries = match read_children(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                tracing::warn!(key = %key, path = %dir.display(), %source, "failed to read directory");
                self.children.insert(key.clone(), Vec::new());
                if let Some(node) = self.nodes.get_mut(key) {
                    node.loaded = true;
                    node.has_children = false;
                }
                return Err(ExpandError::ReadDir {
                    key: key.clone(),
                    path: dir,
                    source,
                });
            }
        };

        let category = key.category().to_string();
        let mut child_keys = Vec::with_capacity(entries.len());
        for entry in entries {
            let child_rel = normalize_rel_path(&rel.join(&entry.name));
            let child_key = NodeKey::new(&category, &child_rel);
            let child = ArtifactNode {
                key: child_key.clone(),
                rel: PathBuf::from(&child_rel),
                name: entry.name,
                level: level + 1,
                is_dir: entry.is_dir,
                expanded: false,
                loaded: false,
                parent: Some(key.clone()),
                has_children: entry.is_dir,
                size: entry.size,
                mod_time: entry.mod_time,
            };
            // Never replace a node that is already in the tree
            self.nodes.entry(child_key.clone()).or_insert(child);
            child_keys.push(child_key);
        }

        tracing::debug!(key = %key, children = child_keys.len(), "loaded directory");
        if let Some(node) = self.nodes.get_mut(key) {
            node.loaded = true;
            node.has_children = !child_keys.is_empty();
            node.expanded = true;
        }
        self.children.insert(key.clone(), child_keys);
        Ok(())
    }

    /// Hide the children of `key`; the cache is kept. Returns false for an
    /// unknown key.
    pub fn collapse(&mut self, key: &NodeKey) -> bool {
        self.set_expanded(key, false)
    }

    pub fn toggle(&mut self, key: &NodeKey) -> std::result::Result<(), ExpandError> {
        match self.nodes.get(key) {
            None => Err(ExpandError::UnknownNode(key.clone())),
            Some(node) if node.expanded => {
                self.collapse(key);
                Ok(())
            }
            Some(_) => self.expand(key),
        }
    }

    fn set_expanded(&mut self, key: &NodeKey, expanded: bool) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Depth-first listing of the roots and every child of an expanded node
    pub fn visible_nodes(&self) -> Vec<&ArtifactNode> {
        let mut visible = Vec::new();
        for root in &self.roots {
            self.collect_visible(root, &mut visible);
        }
        visible
    }

    fn collect_visible<'a>(&'a self, key: &NodeKey, out: &mut Vec<&'a ArtifactNode>) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        out.push(node);
        if node.expanded {
            for child in self.children(key) {
                self.collect_visible(child, out);
            }
        }
    }

    /// Expand every directory from the owning root down to `rel` (relative
    /// to the project root), including `rel` itself when it is a directory.
    /// Returns the key of the deepest node.
    pub fn expand_path(&mut self, rel: &Path) -> std::result::Result<NodeKey, ExpandError> {
        let target = PathBuf::from(normalize_rel_path(rel));

        // Most specific root wins when roots nest
        let root = self
            .roots
            .iter()
            .filter_map(|key| self.nodes.get(key))
            .filter(|node| node.rel == Path::new(".") || target.starts_with(&node.rel))
            .max_by_key(|node| node.rel.components().count())
            .map(|node| (node.key.clone(), node.rel.clone()))
            .ok_or_else(|| ExpandError::OutsideRoots(target.display().to_string()))?;

        let (mut current, root_rel) = root;
        let remainder = target
            .strip_prefix(&root_rel)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| target.clone());

        for component in remainder.components() {
            let name = component.as_os_str().to_string_lossy();
            if name == "." {
                continue;
            }
            self.expand(&current)?;

            let next = self
                .children(&current)
                .iter()
                .find(|key| self.nodes.get(*key).is_some_and(|n| n.name == name))
                .cloned();
            current = match next {
                Some(key) => key,
                None => {
                    let category = current.category().to_string();
                    return Err(ExpandError::UnknownNode(NodeKey::new(
                        &category,
                        &normalize_rel_path(&target),
                    )));
                }
            };
        }

        if self.nodes.get(&current).is_some_and(|n| n.is_dir) {
            self.expand(&current)?;
        }
        Ok(current)
    }

    /// Recursively expand every directory under the opened roots, bounded
    /// by [`MAX_EXPAND_DEPTH`] and [`MAX_EXPAND_DIRS`]. Failures are
    /// collected; the walk continues past them.
    pub fn expand_all(&mut self) -> Vec<ExpandError> {
        let mut errors = Vec::new();
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().cloned().collect();
        let mut expanded = 0usize;

        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(&key) else {
                continue;
            };
            if !node.is_dir || node.level >= MAX_EXPAND_DEPTH {
                continue;
            }
            if expanded >= MAX_EXPAND_DIRS {
                tracing::warn!(limit = MAX_EXPAND_DIRS, "expand_all stopped at directory limit");
                break;
            }

            expanded += 1;
            if let Err(err) = self.expand(&key) {
                errors.push(err);
                continue;
            }
            stack.extend(self.children(&key).iter().rev().cloned());
        }
        errors
    }
}

/// `rel` lies inside `outer`; `.` contains every path
fn is_nested(rel: &str, outer: &str) -> bool {
    outer == "." || Path::new(rel).starts_with(outer)
}
