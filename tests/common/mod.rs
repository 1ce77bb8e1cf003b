//! Shared test utilities for integration and E2E tests.
//!
//! Fixtures here build real Git repositories in a temporary directory, so the
//! tests that use them need a `git` executable on `PATH`. Call
//! [`git_available`] first and return early when it is missing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = TestFixture::new().with_repo("api").with_repo("web");
//!     fixture.command().args(["--command", "status"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::git_available;
    pub use super::TestFixture;
}

/// Returns `true` when a `git` executable can be run.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` with a fixed identity and fail the test on error.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=rgp tests",
            "-c",
            "user.email=tests@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A temporary workspace holding Git repositories.
///
/// Repositories are created under `workspace/`; bare remotes live next to it
/// in `remotes/` so discovery never sees them.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with an empty workspace.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("workspace")
            .create_dir_all()
            .expect("Failed to create workspace");
        temp_dir
            .child("remotes")
            .create_dir_all()
            .expect("Failed to create remotes");
        Self { temp_dir }
    }

    /// Add a repository with one commit on `main` at `workspace/<path>`.
    pub fn with_repo(self, path: &str) -> Self {
        let dir = self.repo_path(path);
        std::fs::create_dir_all(&dir).expect("Failed to create repository directory");
        init_with_commit(&dir);
        self
    }

    /// Add a clone of a fresh bare remote at `workspace/<path>`.
    ///
    /// The remote has `main` and a `dev` branch one commit ahead of it.
    #[allow(dead_code)]
    pub fn with_cloned_repo(self, path: &str) -> Self {
        let name = path.replace('/', "-");
        let seed = self.temp_dir.path().join("remotes").join(format!("{}-seed", name));
        std::fs::create_dir_all(&seed).expect("Failed to create seed directory");
        init_with_commit(&seed);
        git(&seed, &["checkout", "-q", "-b", "dev"]);
        git(&seed, &["commit", "-q", "--allow-empty", "-m", "dev work"]);
        git(&seed, &["checkout", "-q", "main"]);

        let remote = self.temp_dir.path().join("remotes").join(format!("{}.git", name));
        git(
            self.temp_dir.path(),
            &[
                "clone",
                "-q",
                "--bare",
                path_str(&seed),
                path_str(&remote),
            ],
        );

        let target = self.repo_path(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        git(
            self.temp_dir.path(),
            &["clone", "-q", path_str(&remote), path_str(&target)],
        );
        self
    }

    /// Leave an untracked file in `workspace/<path>` so the tree is dirty.
    #[allow(dead_code)]
    pub fn make_dirty(self, path: &str) -> Self {
        self.temp_dir
            .child("workspace")
            .child(path)
            .child("scratch.txt")
            .write_str("work in progress\n")
            .expect("Failed to write file");
        self
    }

    /// Add a plain directory that is not a repository.
    #[allow(dead_code)]
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child("workspace")
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// The workspace root passed to `--path`.
    pub fn workspace(&self) -> PathBuf {
        self.temp_dir.path().join("workspace")
    }

    #[allow(dead_code)]
    pub fn repo_path(&self, path: &str) -> PathBuf {
        self.workspace().join(path)
    }

    /// `rgp --path <workspace> --color never`
    pub fn command(&self) -> assert_cmd::Command {
        self.command_with_color("never")
    }

    /// `rgp --path <workspace> --color <when>`
    pub fn command_with_color(&self, when: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rgp");
        cmd.arg("--path")
            .arg(self.workspace())
            .arg("--color")
            .arg(when)
            .env_remove("RGP_WORKERS")
            .env_remove("RGP_TIMEOUT")
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn init_with_commit(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", "initial"]);
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp paths are UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_workspace() {
        let fixture = TestFixture::new();
        assert!(fixture.workspace().is_dir());
    }

    #[test]
    fn test_fixture_with_repo() {
        if !git_available() {
            return;
        }
        let fixture = TestFixture::new().with_repo("api");
        assert!(fixture.repo_path("api").join(".git").exists());
    }
}
