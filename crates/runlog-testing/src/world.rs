//! TestWorld pattern for declarative integration test setup.

use anyhow::Result;
use assert_cmd::Command;
use filetime::FileTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::fixtures::SampleFiles;

/// Isolated environment for running the `runlog` binary.
///
/// # Example
/// ```no_run
/// use runlog_testing::TestWorld;
///
/// let world = TestWorld::new().with_sample("codex_run.log", "logs/run.log");
/// let result = world.run(&["report", "logs/run.log"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    cwd: PathBuf,
    env_vars: HashMap<String, String>,
    samples: SampleFiles,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cwd = temp_dir.path().to_path_buf();

        Self {
            cwd,
            temp_dir,
            env_vars: HashMap::new(),
            samples: SampleFiles::new(),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve a path relative to the temp root
    pub fn path<P: AsRef<Path>>(&self, rel: P) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    /// Change the working directory (relative to temp root), creating it
    pub fn enter_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.set_cwd(path);
        self
    }

    pub fn set_cwd<P: AsRef<Path>>(&mut self, path: P) {
        let new_cwd = self.path(path);
        std::fs::create_dir_all(&new_cwd).expect("Failed to create directory");
        self.cwd = new_cwd;
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write `runlog.toml` into the current working directory
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.cwd.join("runlog.toml"), toml).expect("Failed to write config");
        self
    }

    /// Write a file relative to the temp root, creating parent dirs
    pub fn with_file<P: AsRef<Path>>(self, rel: P, contents: &str) -> Self {
        self.write_file(rel, contents).expect("Failed to write file");
        self
    }

    pub fn with_dir<P: AsRef<Path>>(self, rel: P) -> Self {
        std::fs::create_dir_all(self.path(rel)).expect("Failed to create directory");
        self
    }

    /// Copy a sample transcript to `dest` (relative to temp root)
    pub fn with_sample(self, sample_name: &str, dest: &str) -> Self {
        let dest = self.path(dest);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        self.samples
            .copy_to(sample_name, &dest)
            .expect("Failed to copy sample");
        self
    }

    pub fn write_file<P: AsRef<Path>>(&self, rel: P, contents: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Backdate the modification time of a file or directory
    pub fn set_age<P: AsRef<Path>>(&self, rel: P, age: Duration) -> Result<()> {
        let when = SystemTime::now() - age;
        filetime::set_file_mtime(self.path(rel), FileTime::from_system_time(when))?;
        Ok(())
    }

    /// Configure a CLI command with this environment's cwd and variables.
    ///
    /// The user config directory is pointed inside the temp root so a
    /// developer's own config never leaks into a test.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(&self.cwd)
            .env_remove("RUNLOG_CONFIG")
            .env_remove("RUNLOG_PROJECT_ROOT")
            .env_remove("RUNLOG_LOG")
            .env("HOME", self.temp_dir.path())
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join(".config"));

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("runlog")
            .map_err(|e| anyhow::anyhow!("Failed to find runlog binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
