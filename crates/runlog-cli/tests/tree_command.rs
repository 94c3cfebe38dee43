use assert_cmd::Command;
use predicates::prelude::*;
use runlog_testing::TestWorld;
use std::time::Duration;

fn staging_world() -> TestWorld {
    TestWorld::new()
        .with_file("staging/run-1/out.log", "x")
        .with_file("staging/notes.md", "hello")
}

#[test]
fn test_tree_summaries() {
    let world = staging_world();
    world.set_age("staging/notes.md", Duration::from_secs(3 * 3600 + 30)).unwrap();
    world.set_age("staging/run-1", Duration::from_secs(5 * 3600)).unwrap();

    let result = world.run(&["tree"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let lines: Vec<&str> = result.stdout().lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "staging  Staging artifacts  2 items • updated 3h ago");
    assert_eq!(lines[1], "apps     Applications       Directory missing");
}

#[test]
fn test_tree_empty_root() {
    let world = TestWorld::new().with_dir("apps");

    let json = world.run(&["tree", "--format", "json"]).unwrap().json().unwrap();
    assert_eq!(json[1]["name"], "apps");
    assert_eq!(json[1]["summary"], "Empty");
}

#[test]
fn test_tree_collapsed_by_default() {
    let world = staging_world();

    let result = world.run(&["tree", "staging"]).unwrap();
    assert!(result.success());
    assert_eq!(result.stdout(), "▸ staging/  just now\n");
}

#[test]
fn test_tree_expand_path() {
    let world = staging_world();

    let result = world
        .run(&["tree", "staging", "--expand", "staging/run-1"])
        .unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(
        result.stdout(),
        "▾ staging/  just now\n  ▾ run-1/  just now\n    out.log  1 B  just now\n  notes.md  5 B  just now\n"
    );
}

#[test]
fn test_tree_expand_all_json() {
    let world = staging_world();

    let json = world
        .run(&["tree", "staging", "--expand-all", "--format", "json"])
        .unwrap()
        .json()
        .unwrap();
    let nodes = json.as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["key"], "staging:staging");
    assert_eq!(nodes[1]["key"], "staging:staging/run-1");
    assert_eq!(nodes[1]["level"], 1);
    assert_eq!(nodes[3]["name"], "notes.md");
    assert_eq!(nodes[3]["size"], 5);
}

#[test]
fn test_tree_bad_expand_warns_and_continues() {
    let world = staging_world();

    let result = world
        .run(&["tree", "staging", "--expand", "staging/nope"])
        .unwrap();
    assert!(result.success());
    assert!(result.stderr().contains("warning: unknown node 'staging:staging/nope'"));
    assert!(result.stdout().starts_with("▾ staging/"));
}

#[test]
fn test_tree_project_root_flag() {
    let world = staging_world().with_dir("elsewhere").enter_dir("elsewhere");

    let root = world.temp_dir().to_string_lossy().into_owned();
    let result = world
        .run(&["--project-root", root.as_str(), "tree", "staging"])
        .unwrap();
    assert!(result.success());
    assert!(result.stdout().starts_with("▸ staging/"));

    let result = world.run(&["tree", "staging"]).unwrap();
    assert!(result.stderr().contains("warning: no root of 'staging' exists"));
    assert!(result.stdout().is_empty());
}

#[test]
#[allow(deprecated)]
fn test_tree_unknown_category() {
    let world = staging_world();

    let mut cmd = Command::cargo_bin("runlog").unwrap();
    world
        .configure_command(&mut cmd)
        .args(["tree", "releases"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown category 'releases'"));
}

#[test]
fn test_tree_custom_categories() {
    let world = TestWorld::new()
        .with_file("out/runs/a.txt", "a")
        .with_config("[[explorer.categories]]\nname = \"runs\"\nlabel = \"Runs\"\nroots = [\"out/runs\"]\n");

    let result = world.run(&["tree"]).unwrap();
    assert!(result.success());
    assert!(result.stdout().starts_with("runs  Runs  1 items • updated"));
}
