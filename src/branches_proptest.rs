//! Property-based tests for branch parsing and batch cardinality.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::branches::parse_remote_branches;
    use crate::config::ExecutionConfig;
    use crate::git::mock::{failed, ok, MockGit};
    use crate::repository::RepositoryDescriptor;
    use crate::runner::CommandRunner;
    use crate::scheduler::{NoopObserver, Scheduler};
    use proptest::prelude::*;

    // ============================================================================
    // parse_remote_branches property tests
    // ============================================================================

    proptest! {
        /// Property: parsed branches never come from blank or symbolic lines
        #[test]
        fn parse_never_yields_symbolic_or_blank(listing in "[ a-z/>\\-\n]{0,200}") {
            for branch in parse_remote_branches(&listing) {
                prop_assert!(!branch.name.is_empty());
                prop_assert!(!branch.name.contains("->"));
                prop_assert!(!branch.remote.is_empty());
            }
        }

        /// Property: at most one branch per input line
        #[test]
        fn parse_yields_at_most_one_branch_per_line(listing in "[ a-z/>\\-\n]{0,200}") {
            let branches = parse_remote_branches(&listing);
            prop_assert!(branches.len() <= listing.lines().count());
        }

        /// Property: well-formed origin listings round-trip to their branch names
        #[test]
        fn parse_recovers_origin_branch_names(names in prop::collection::vec("[a-z][a-z0-9_]{0,12}", 0..10)) {
            let listing: String = names
                .iter()
                .map(|n| format!("  origin/{}\n", n))
                .collect();
            let parsed: Vec<String> = parse_remote_branches(&listing)
                .into_iter()
                .map(|b| b.name)
                .collect();
            prop_assert_eq!(parsed, names);
        }
    }

    // ============================================================================
    // Scheduler cardinality property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: N repositories in, N outcomes out, in every mode
        #[test]
        fn scheduler_returns_one_outcome_per_repository(
            count in 0usize..40,
            workers in 1usize..9,
            parallel in any::<bool>(),
            failing_every in 1usize..5,
        ) {
            let git = MockGit::new(move |dir: &std::path::Path, _: &[&str]| {
                let index: usize = dir
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(0);
                if index % failing_every == 0 {
                    failed(1, "nope")
                } else {
                    ok("")
                }
            });
            let config = ExecutionConfig {
                parallel,
                max_workers: workers,
                ..ExecutionConfig::for_command("status")
            };
            let repos: Vec<_> = (0..count)
                .map(|i| RepositoryDescriptor::new(format!("r{}", i), format!("/tmp/{}", i)))
                .collect();

            let outcomes = Scheduler::new(CommandRunner::new(&git, &config))
                .run(&repos, &NoopObserver)
                .unwrap();

            prop_assert_eq!(outcomes.len(), count);
            prop_assert_eq!(git.call_count(), count);
        }
    }
}
