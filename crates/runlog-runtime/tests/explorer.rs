use chrono::{Duration, Utc};
use filetime::FileTime;
use runlog_runtime::{CategoryConfig, Config, ExpandError, Explorer};
use runlog_types::NodeKey;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn staging_explorer(root: &Path) -> Explorer {
    Explorer::new(root, vec![CategoryConfig::new("staging", "Staging", &["staging"])])
}

fn set_age(path: &Path, age: Duration) {
    let when = Utc::now() - age;
    let mtime = FileTime::from_unix_time(when.timestamp(), 0);
    filetime::set_file_mtime(path, mtime).unwrap();
}

#[test]
fn test_empty_root_summary_and_expand() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("staging")).unwrap();

    let mut explorer = staging_explorer(temp_dir.path());
    assert_eq!(explorer.summarize("staging").unwrap(), "Empty");

    let roots = explorer.open_category("staging").unwrap();
    explorer.expand(&roots[0]).unwrap();

    let root = explorer.node(&roots[0]).unwrap();
    assert!(root.loaded);
    assert!(root.expanded);
    assert!(!root.has_children);
    assert!(explorer.children(&roots[0]).is_empty());
}

#[test]
fn test_toggle_twice_restores_state_and_keeps_cache() {
    let temp_dir = TempDir::new().unwrap();
    let staging = temp_dir.path().join("staging");
    fs::create_dir_all(staging.join("run-1")).unwrap();
    fs::write(staging.join("notes.md"), "# notes").unwrap();

    let mut explorer = staging_explorer(temp_dir.path());
    let root = explorer.open_category("staging").unwrap().remove(0);
    explorer.expand(&root).unwrap();
    let cached = explorer.children(&root).to_vec();

    explorer.toggle(&root).unwrap();
    assert!(!explorer.node(&root).unwrap().expanded);
    explorer.toggle(&root).unwrap();

    assert!(explorer.node(&root).unwrap().expanded);
    assert_eq!(explorer.children(&root), cached.as_slice());
    assert_eq!(explorer.visible_nodes().len(), 3);
}

#[test]
fn test_toggle_from_collapsed_loads_once() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("staging/a")).unwrap();

    let mut explorer = staging_explorer(temp_dir.path());
    let root = explorer.open_category("staging").unwrap().remove(0);
    assert!(!explorer.node(&root).unwrap().loaded);

    explorer.toggle(&root).unwrap();
    explorer.toggle(&root).unwrap();

    let node = explorer.node(&root).unwrap();
    assert!(node.loaded);
    assert!(!node.expanded);
    assert_eq!(explorer.children(&root).len(), 1);
}

#[test]
fn test_summary_counts_items_across_roots() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join(".staging")).unwrap();
    fs::create_dir_all(root.join("staging")).unwrap();
    fs::write(root.join(".staging/a.txt"), "a").unwrap();
    fs::write(root.join("staging/b.txt"), "b").unwrap();
    fs::write(root.join("staging/c.txt"), "c").unwrap();
    for name in [".staging/a.txt", "staging/b.txt", "staging/c.txt"] {
        set_age(&root.join(name), Duration::hours(5));
    }
    set_age(&root.join("staging/c.txt"), Duration::hours(2) + Duration::seconds(30));

    let explorer = Explorer::from_config(root, &Config::default().explorer);
    assert_eq!(
        explorer.summarize("staging").unwrap(),
        "3 items • updated 2h ago"
    );
    assert_eq!(explorer.summarize("apps").unwrap(), "Directory missing");

    let summaries = explorer.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].label, "Staging artifacts");
    assert_eq!(summaries[1].summary, "Directory missing");
}

#[test]
fn test_child_mtime_and_levels() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("staging/run-1/out.log");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "0123456789").unwrap();
    filetime::set_file_mtime(&file, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

    let mut explorer = staging_explorer(temp_dir.path());
    explorer.open_category("staging").unwrap();
    let key = explorer.expand_path(Path::new("staging/run-1/out.log")).unwrap();

    let node = explorer.node(&key).unwrap();
    assert_eq!(key, NodeKey::new("staging", "staging/run-1/out.log"));
    assert_eq!(node.level, 2);
    assert_eq!(node.size, 10);
    assert!(!node.is_dir);
    assert_eq!(node.mod_time.unwrap().timestamp(), 1_700_000_000);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_marked_loaded() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let locked = temp_dir.path().join("staging/locked");
    fs::create_dir_all(&locked).unwrap();
    fs::create_dir_all(temp_dir.path().join("staging/open")).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits are not enforced for root
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut explorer = staging_explorer(temp_dir.path());
    explorer.open_category("staging").unwrap();
    let errors = explorer.expand_all();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ExpandError::ReadDir { .. }));

    let locked_key = NodeKey::new("staging", "staging/locked");
    let node = explorer.node(&locked_key).unwrap();
    assert!(node.loaded);
    assert!(!node.has_children);
    assert!(!node.expanded);

    // Sibling still expanded, and a retry does not hit the disk again
    assert!(explorer.node(&NodeKey::new("staging", "staging/open")).unwrap().expanded);
    assert!(explorer.expand(&locked_key).is_ok());
}
