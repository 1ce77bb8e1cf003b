//! # Multi-Branch Pull
//!
//! Pulls every remote-tracking branch of a repository, one after another.
//!
//! ## Process
//!
//! 1.  **Listing**: `git branch -r`, bounded by the configured timeout. If the
//!     listing fails nothing is pulled and the outcome records a tooling
//!     error, or a timeout if the deadline expired.
//! 2.  **Parsing**: one branch per line. Blank lines and symbolic references
//!     (`origin/HEAD -> origin/main`) are skipped, and the leading remote name
//!     is split off.
//! 3.  **Pulling**: `git pull <remote> <branch>` for each branch in listing
//!     order, each with its own deadline. Output is collected as one
//!     `Branch <name>: ...` block per branch.
//!
//! The first failing branch stops the sequence. A branch that hits its
//! deadline is recorded as a timeout rather than a branch failure. The repository then counts as
//! failed as a whole, while the blocks gathered up to that point are kept.

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;

use crate::git::{GitError, GitOperations};
use crate::outcome::{ExecutionOutcome, FailureKind, OutcomeError};
use crate::repository::RepositoryDescriptor;

/// Command label recorded on multi-branch outcomes.
pub const ALL_BRANCHES_LABEL: &str = "pull --all";

/// Remote assumed for listing lines that carry no remote prefix.
const DEFAULT_REMOTE: &str = "origin";

/// A remote-tracking branch, split into remote and branch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub name: String,
}

impl RemoteBranch {
    pub fn new(remote: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RemoteBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remote == DEFAULT_REMOTE {
            f.write_str(&self.name)
        } else {
            write!(f, "{}/{}", self.remote, self.name)
        }
    }
}

/// Parse the output of `git branch -r`.
///
/// `origin/feature/login` becomes remote `origin`, branch `feature/login`.
pub fn parse_remote_branches(listing: &str) -> Vec<RemoteBranch> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("->"))
        .map(|line| match line.split_once('/') {
            Some((remote, name)) if !remote.is_empty() && !name.is_empty() => {
                RemoteBranch::new(remote, name)
            }
            _ => RemoteBranch::new(DEFAULT_REMOTE, line),
        })
        .collect()
}

/// Pull every remote branch of `repo`, stopping at the first failure.
///
/// `started` is when work on this repository began, so the recorded duration
/// includes any checks the caller ran first.
pub fn pull_all_branches(
    git: &dyn GitOperations,
    repo: &RepositoryDescriptor,
    timeout: Duration,
    started: Instant,
) -> ExecutionOutcome {
    let listing = match git.run(&repo.path, &["branch", "-r"], Some(timeout)) {
        Ok(output) => output.stdout,
        Err(err) => {
            return ExecutionOutcome::failure(
                repo.clone(),
                ALL_BRANCHES_LABEL,
                "",
                OutcomeError::new(
                    failure_kind(&err, FailureKind::Tooling),
                    format!("Error getting remote branches: {}", err),
                ),
                started.elapsed(),
            );
        }
    };

    let branches = parse_remote_branches(&listing);
    debug!("{}: pulling {} remote branches", repo.name, branches.len());

    let mut blocks = Vec::with_capacity(branches.len());
    for branch in &branches {
        let result = git.run(
            &repo.path,
            &["pull", branch.remote.as_str(), branch.name.as_str()],
            Some(timeout),
        );
        match result {
            Ok(output) => blocks.push(format!("Branch {}: {}", branch, output.combined)),
            Err(err) => {
                let captured = err.output().map(|o| o.combined.as_str()).unwrap_or("");
                blocks.push(format!("Branch {} (failed): {}", branch, captured));
                return ExecutionOutcome::failure(
                    repo.clone(),
                    ALL_BRANCHES_LABEL,
                    blocks.join("\n"),
                    OutcomeError::new(
                        failure_kind(&err, FailureKind::Branch),
                        format!("Error pulling branch {}: {}", branch, err),
                    ),
                    started.elapsed(),
                );
            }
        }
    }

    ExecutionOutcome::success(
        repo.clone(),
        ALL_BRANCHES_LABEL,
        blocks.join("\n"),
        started.elapsed(),
    )
}

fn failure_kind(err: &GitError, otherwise: FailureKind) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else {
        otherwise
    }
}
