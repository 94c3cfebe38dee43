use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Stat result for one directory entry, links resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryInfo {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mod_time: Option<DateTime<Utc>>,
}

impl EntryInfo {
    pub fn stat(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // fs::metadata follows links; a dangling link becomes an empty file
        match fs::metadata(path) {
            Ok(metadata) => Self {
                name,
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
                mod_time: metadata.modified().ok().map(DateTime::<Utc>::from),
            },
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "stat failed, treating as empty file");
                Self {
                    name,
                    is_dir: false,
                    size: 0,
                    mod_time: None,
                }
            }
        }
    }
}

/// Immediate children of `dir`, directories first, then case-insensitive
/// name order.
pub(crate) fn read_children(dir: &Path) -> io::Result<Vec<EntryInfo>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        entries.push(EntryInfo::stat(entry.path()));
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_children_orders_dirs_first() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("b.txt"), "bb").unwrap();
        fs::write(root.join("A.txt"), "a").unwrap();
        fs::create_dir(root.join("zeta")).unwrap();
        fs::create_dir(root.join("Alpha")).unwrap();

        let names: Vec<String> = read_children(root)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_read_children_missing_dir_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_children(&temp_dir.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_followed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("target")).unwrap();
        std::os::unix::fs::symlink(root.join("target"), root.join("link")).unwrap();
        std::os::unix::fs::symlink(root.join("gone"), root.join("dangling")).unwrap();

        let children = read_children(root).unwrap();
        let link = children.iter().find(|e| e.name == "link").unwrap();
        assert!(link.is_dir);

        let dangling = children.iter().find(|e| e.name == "dangling").unwrap();
        assert!(!dangling.is_dir);
        assert_eq!(dangling.size, 0);
        assert_eq!(dangling.mod_time, None);
    }
}
