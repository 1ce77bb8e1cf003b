//! # Execution Scheduler
//!
//! Runs a [`CommandRunner`] over every discovered repository and gathers one
//! outcome per repository.
//!
//! ## Modes
//!
//! - **Sequential**: repositories are processed one at a time in input order.
//! - **Parallel**: a dedicated rayon pool with exactly `max_workers` threads
//!   drains the repository list. Each worker publishes its outcome on an mpsc
//!   channel as soon as it is built; the scheduler returns once the pool has
//!   finished every repository.
//!
//! ## Ordering contract
//!
//! Sequential results follow input order. Parallel results arrive in
//! completion order, which is not stable between runs. Callers that need a
//! stable presentation sort afterwards; the reporter sorts by repository name.
//!
//! In both modes the number of outcomes equals the number of repositories:
//! a failing repository records its failure and the batch carries on.

use std::sync::mpsc;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::outcome::ExecutionOutcome;
use crate::repository::RepositoryDescriptor;
use crate::runner::CommandRunner;

/// Hooks called around every repository's run.
///
/// In parallel mode the hooks are called from worker threads, concurrently.
pub trait ExecutionObserver: Sync {
    fn on_start(&self, _repo: &RepositoryDescriptor, _command: &str) {}
    fn on_finish(&self, _outcome: &ExecutionOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// Drives a runner across a batch of repositories.
pub struct Scheduler<'a> {
    runner: CommandRunner<'a>,
}

impl<'a> Scheduler<'a> {
    pub fn new(runner: CommandRunner<'a>) -> Self {
        Self { runner }
    }

    /// Run the configured command in every repository.
    ///
    /// Only fails when the worker pool cannot be created.
    pub fn run(
        &self,
        repos: &[RepositoryDescriptor],
        observer: &dyn ExecutionObserver,
    ) -> Result<Vec<ExecutionOutcome>> {
        let config = self.runner.config();
        if config.parallel {
            self.run_parallel(repos, config.max_workers, observer)
        } else {
            Ok(self.run_sequential(repos, observer))
        }
    }

    fn run_sequential(
        &self,
        repos: &[RepositoryDescriptor],
        observer: &dyn ExecutionObserver,
    ) -> Vec<ExecutionOutcome> {
        debug!("running sequentially over {} repositories", repos.len());
        repos
            .iter()
            .map(|repo| self.run_one(repo, observer))
            .collect()
    }

    fn run_parallel(
        &self,
        repos: &[RepositoryDescriptor],
        workers: usize,
        observer: &dyn ExecutionObserver,
    ) -> Result<Vec<ExecutionOutcome>> {
        debug!(
            "running {} repositories on {} workers",
            repos.len(),
            workers
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("rgp-worker-{}", index))
            .build()?;

        let (tx, rx) = mpsc::channel();
        pool.install(|| {
            // One job per repository, so a slow one never holds others back.
            repos.par_iter().with_max_len(1).for_each_with(tx, |tx, repo| {
                let outcome = self.run_one(repo, observer);
                // The receiver outlives the pool, so sending cannot fail.
                let _ = tx.send(outcome);
            });
        });

        // Every sender was dropped with the pool's work items.
        Ok(rx.into_iter().collect())
    }

    fn run_one(
        &self,
        repo: &RepositoryDescriptor,
        observer: &dyn ExecutionObserver,
    ) -> ExecutionOutcome {
        observer.on_start(repo, &self.runner.config().command);
        let outcome = self.runner.run(repo);
        observer.on_finish(&outcome);
        outcome
    }
}
