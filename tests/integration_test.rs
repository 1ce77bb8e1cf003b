//! Integration tests for the library against real repositories.
//!
//! These drive `find_repositories`, `CommandRunner` and `Scheduler` directly,
//! with `SystemGit` as the backend.

mod common;
use common::prelude::*;

use std::time::Duration;

use rgp::config::ExecutionConfig;
use rgp::git::SystemGit;
use rgp::locator::{find_repositories, RepositoryFilter};
use rgp::outcome::{ExecutionOutcome, FailureKind};
use rgp::report::Summary;
use rgp::runner::CommandRunner;
use rgp::scheduler::{NoopObserver, Scheduler};

fn run(fixture: &TestFixture, config: &ExecutionConfig) -> Vec<ExecutionOutcome> {
    let repos = find_repositories(&fixture.workspace(), &RepositoryFilter::accept_all()).unwrap();
    let git = SystemGit::new();
    Scheduler::new(CommandRunner::new(&git, config))
        .run(&repos, &NoopObserver)
        .unwrap()
}

/// (name, succeeded, output) in name order.
fn digest(outcomes: Vec<ExecutionOutcome>) -> Vec<(String, bool, String)> {
    Summary::new(outcomes, Duration::ZERO)
        .outcomes()
        .iter()
        .map(|o| (o.repository.name.clone(), o.succeeded, o.output.clone()))
        .collect()
}

#[test]
fn test_sequential_and_parallel_agree() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new()
        .with_repo("one")
        .with_repo("two")
        .with_repo("three")
        .with_repo("nested/four")
        .with_repo("five");

    let sequential = ExecutionConfig {
        parallel: false,
        ..ExecutionConfig::for_command("rev-parse --abbrev-ref HEAD")
    };
    let parallel = ExecutionConfig {
        parallel: true,
        max_workers: 2,
        ..sequential.clone()
    };

    let a = digest(run(&fixture, &sequential));
    let b = digest(run(&fixture, &parallel));

    assert_eq!(a.len(), 5);
    assert_eq!(a, b);
    assert!(a.iter().all(|(_, ok, output)| *ok && output.trim() == "main"));
}

#[test]
fn test_status_is_idempotent() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new().with_repo("api").with_repo("web");
    let config = ExecutionConfig::for_command("status --porcelain");

    let first = digest(run(&fixture, &config));
    let second = digest(run(&fixture, &config));

    assert_eq!(first, second);
}

#[test]
fn test_failure_is_isolated_to_its_repository() {
    if !git_available() {
        return;
    }
    // No remote is configured in "orphan", so pulling it fails.
    let fixture = TestFixture::new()
        .with_repo("orphan")
        .with_cloned_repo("tracked");
    let config = ExecutionConfig::for_command("pull");

    let outcomes = Summary::new(run(&fixture, &config), Duration::ZERO);
    let by_name = |name: &str| {
        outcomes
            .outcomes()
            .iter()
            .find(|o| o.repository.name == name)
            .unwrap()
            .clone()
    };

    assert!(by_name("tracked").succeeded);
    assert_eq!(by_name("orphan").failure_kind(), Some(FailureKind::Command));
    assert_eq!(outcomes.exit_code(), 1);
}

#[test]
fn test_dirty_repository_is_skipped_without_pulling() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new().with_cloned_repo("app").make_dirty("app");
    let config = ExecutionConfig {
        ignore_dirty: true,
        ..ExecutionConfig::for_command("pull")
    };

    let outcomes = run(&fixture, &config);

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_skipped());
    assert_eq!(
        outcomes[0].error_message(),
        "Repository has uncommitted changes (skipped)"
    );
    assert!(outcomes[0].output.is_empty());
}

#[test]
fn test_all_branches_pulls_each_remote_branch() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new().with_cloned_repo("app");
    let config = ExecutionConfig {
        all_branches: true,
        ..ExecutionConfig::for_command("pull")
    };

    let outcomes = run(&fixture, &config);

    assert_eq!(outcomes.len(), 1);
    let outcome = &outcomes[0];
    assert!(outcome.succeeded, "{:?}", outcome.error);
    assert_eq!(outcome.command, "pull --all");
    let dev = outcome.output.find("Branch dev:").unwrap();
    let main = outcome.output.find("Branch main:").unwrap();
    assert!(dev < main);
}

#[test]
fn test_all_branches_ignored_for_other_commands() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new().with_cloned_repo("app");
    let config = ExecutionConfig {
        all_branches: true,
        ..ExecutionConfig::for_command("fetch")
    };

    let outcomes = run(&fixture, &config);

    assert!(outcomes[0].succeeded);
    assert_eq!(outcomes[0].command, "fetch");
}
