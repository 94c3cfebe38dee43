use crate::Result;
use runlog_types::normalize_rel_path;
use std::path::{Path, PathBuf};

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Discover project root based on priority:
/// 1. explicit_project_root (--project-root flag)
/// 2. RUNLOG_PROJECT_ROOT environment variable
/// 3. Current working directory
pub fn discover_project_root(explicit_project_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit_project_root {
        return Ok(root.to_path_buf());
    }

    if let Ok(env_root) = std::env::var("RUNLOG_PROJECT_ROOT") {
        return Ok(expand_tilde(&env_root));
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd)
}

/// Join relative paths onto `base`; absolute paths pass through
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// `path` relative to `base` with `/` separators when it lies beneath
/// `base`, otherwise the path as given.
pub fn display_relative(path: &Path, base: &Path) -> String {
    absolutize(path, base)
        .strip_prefix(base)
        .map(normalize_rel_path)
        .unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/etc/runlog.toml"), PathBuf::from("/etc/runlog.toml"));
        assert_eq!(expand_tilde("runlog.toml"), PathBuf::from("runlog.toml"));
    }

    #[test]
    fn test_explicit_project_root_wins() {
        let root = discover_project_root(Some(Path::new("/srv/project"))).unwrap();
        assert_eq!(root, PathBuf::from("/srv/project"));
    }

    #[test]
    fn test_display_relative() {
        let base = Path::new("/work/demo");
        assert_eq!(display_relative(Path::new("/work/demo/logs/run.log"), base), "logs/run.log");
        assert_eq!(display_relative(Path::new("logs/run.log"), base), "logs/run.log");
        assert_eq!(display_relative(Path::new("/elsewhere/run.log"), base), "/elsewhere/run.log");
    }

    #[test]
    fn test_absolutize() {
        let base = Path::new("/work");
        assert_eq!(absolutize(Path::new("a/b"), base), PathBuf::from("/work/a/b"));
        assert_eq!(absolutize(Path::new("/x"), base), PathBuf::from("/x"));
    }
}
