//! # Command Runner
//!
//! Runs the configured git command against a single repository and turns
//! whatever happens into an [`ExecutionOutcome`]. The runner never returns an
//! error: every failure is recorded on the outcome with its [`FailureKind`].
//!
//! ## Decision order
//!
//! 1.  With `ignore_dirty` set and the command being `pull`, the working tree
//!     is checked first. A dirty tree produces a `Skipped` outcome and no pull
//!     is spawned.
//! 2.  With `all_branches` set and the command being `pull`, the work is handed
//!     to [`pull_all_branches`].
//! 3.  Otherwise the command is split on whitespace and run once, bounded by
//!     the configured timeout.
//!
//! The reported duration always starts when [`CommandRunner::run`] is called,
//! so it includes the dirty check.

use std::time::Instant;

use log::debug;

use crate::branches::pull_all_branches;
use crate::config::ExecutionConfig;
use crate::dirty::is_dirty;
use crate::duration::format_duration;
use crate::git::{GitError, GitOperations};
use crate::outcome::{ExecutionOutcome, FailureKind, OutcomeError};
use crate::repository::RepositoryDescriptor;

/// Message recorded when a dirty working tree vetoes a pull.
pub const DIRTY_SKIP_MESSAGE: &str = "Repository has uncommitted changes (skipped)";

/// Runs one configured command per repository.
///
/// The runner only reads its configuration and the git backend, so one
/// instance is shared by every worker of a batch.
pub struct CommandRunner<'a> {
    git: &'a dyn GitOperations,
    config: &'a ExecutionConfig,
}

impl<'a> CommandRunner<'a> {
    pub fn new(git: &'a dyn GitOperations, config: &'a ExecutionConfig) -> Self {
        Self { git, config }
    }

    pub fn config(&self) -> &ExecutionConfig {
        self.config
    }

    /// Run the configured command in `repo`.
    pub fn run(&self, repo: &RepositoryDescriptor) -> ExecutionOutcome {
        let started = Instant::now();
        let command = self.config.command.trim();

        if self.config.ignore_dirty && self.config.is_pull() {
            match is_dirty(self.git, &repo.path) {
                Ok(false) => {}
                Ok(true) => {
                    debug!("{}: working tree is dirty, skipping pull", repo.name);
                    return ExecutionOutcome::failure(
                        repo.clone(),
                        command,
                        "",
                        OutcomeError::new(FailureKind::Skipped, DIRTY_SKIP_MESSAGE),
                        started.elapsed(),
                    );
                }
                Err(err) => {
                    return ExecutionOutcome::failure(
                        repo.clone(),
                        command,
                        "",
                        OutcomeError::new(
                            FailureKind::Tooling,
                            format!("Error checking repository status: {}", err),
                        ),
                        started.elapsed(),
                    );
                }
            }
        }

        if self.config.all_branches && self.config.is_pull() {
            return pull_all_branches(self.git, repo, self.config.timeout, started);
        }

        let args: Vec<&str> = command.split_whitespace().collect();
        match self.git.run(&repo.path, &args, Some(self.config.timeout)) {
            Ok(output) => {
                ExecutionOutcome::success(repo.clone(), command, output.combined, started.elapsed())
            }
            Err(err) => {
                let output = err
                    .output()
                    .map(|o| o.combined.clone())
                    .unwrap_or_default();
                ExecutionOutcome::failure(
                    repo.clone(),
                    command,
                    output,
                    self.classify(&err),
                    started.elapsed(),
                )
            }
        }
    }

    fn classify(&self, err: &GitError) -> OutcomeError {
        if err.is_timeout() {
            OutcomeError::new(
                FailureKind::Timeout,
                format!(
                    "Command timed out after {}",
                    format_duration(self.config.timeout)
                ),
            )
        } else {
            OutcomeError::new(FailureKind::Command, err.to_string())
        }
    }
}
