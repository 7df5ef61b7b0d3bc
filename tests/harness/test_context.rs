//! Shared testing harness for `dbnomics-ci` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Token sent by the CLI under test.
pub(crate) const TEST_TOKEN: &str = "test-token";

/// Testing harness providing an isolated environment for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, work_dir }
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub(crate) fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the working directory used for CLI invocations.
    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for the compiled binary with a private token set.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = self.cli_without_token();
        cmd.env("PRIVATE_TOKEN", TEST_TOKEN);
        cmd
    }

    /// Build a command for the compiled binary with no GitLab environment.
    pub(crate) fn cli_without_token(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("dbnomics-ci").expect("Failed to locate dbnomics-ci binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", self.home())
            .env_remove("PRIVATE_TOKEN")
            .env_remove("GITLAB_URL")
            .env_remove("RUST_LOG")
            .env_remove("BROWSER");
        cmd
    }

    /// Build a command targeting a GitLab mock server.
    pub(crate) fn cli_against(&self, server: &mockito::Server) -> Command {
        let mut cmd = self.cli();
        cmd.env("GITLAB_URL", server.url());
        cmd
    }

    /// Write `dbnomics-ci.toml` in the working directory.
    pub(crate) fn write_config(&self, content: &str) {
        fs::write(self.work_dir.join("dbnomics-ci.toml"), content).expect("write config");
    }

    /// Write a file in the working directory and return its path.
    pub(crate) fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        fs::write(&path, content).expect("write file");
        path
    }
}
