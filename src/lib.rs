//! # Recursive Git Pull
//!
//! This library finds Git repositories under a directory and runs one Git
//! command in each of them, sequentially or on a bounded pool of workers. It
//! powers the `rgp` command-line tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Instant;
//!
//! use rgp::config::ExecutionConfig;
//! use rgp::git::SystemGit;
//! use rgp::locator::{find_repositories, RepositoryFilter};
//! use rgp::report::Summary;
//! use rgp::runner::CommandRunner;
//! use rgp::scheduler::{NoopObserver, Scheduler};
//!
//! let filter = RepositoryFilter::new(["*-service"], Vec::<String>::new()).unwrap();
//! let repos = find_repositories(Path::new("./workspace"), &filter).unwrap();
//!
//! let config = ExecutionConfig::for_command("fetch --prune");
//! let git = SystemGit::new();
//! let started = Instant::now();
//! let outcomes = Scheduler::new(CommandRunner::new(&git, &config))
//!     .run(&repos, &NoopObserver)
//!     .unwrap();
//!
//! let summary = Summary::new(outcomes, started.elapsed());
//! std::process::exit(summary.exit_code());
//! ```
//!
//! ## Core Concepts
//!
//! - **Discovery (`locator`)**: walks a root directory and yields a
//!   `RepositoryDescriptor` for each working directory containing `.git`,
//!   filtered by include/exclude glob patterns.
//! - **Process layer (`git`)**: the `GitOperations` trait and its system
//!   implementation, which runs `git` with an optional per-call deadline.
//! - **Runner (`runner`)**: one command against one repository, including the
//!   dirty-tree guard (`dirty`) and the multi-branch pull (`branches`).
//! - **Scheduler (`scheduler`)**: sequential loop or bounded worker pool; one
//!   `ExecutionOutcome` per repository, always.
//! - **Reporting (`report`, `output`)**: sorted summary, text or JSON, exit
//!   code, with color settings passed in explicitly.
//!
//! ## Failure Model
//!
//! Failures of individual repositories never abort a batch. They are recorded
//! on the repository's outcome with a `FailureKind` tag (tooling error, skip,
//! timeout, command failure, branch failure). Only conditions that prevent a
//! run from starting surface as `rgp::error::Error`.

pub mod branches;
pub mod config;
pub mod dirty;
pub mod duration;
pub mod error;
pub mod git;
pub mod locator;
pub mod outcome;
pub mod output;
pub mod report;
pub mod repository;
pub mod runner;
pub mod scheduler;

#[cfg(test)]
mod branches_proptest;
