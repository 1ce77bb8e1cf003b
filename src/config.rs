//! # Execution Configuration
//!
//! [`ExecutionConfig`] is the immutable snapshot every worker reads while a
//! batch runs. It is built once, validated once, and then only shared by
//! reference; nothing in the engine mutates it, which is why the worker pool
//! needs no locking around it.
//!
//! The defaults mirror the command-line defaults: `git pull`, parallel with
//! four workers, a thirty second bound per invocation.

use std::time::Duration;

use crate::error::{Error, Result};

/// The command run when none is given.
pub const DEFAULT_COMMAND: &str = "pull";

/// Worker count used when none is given.
pub const DEFAULT_WORKERS: usize = 4;

/// Per-invocation bound used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared read-only by every worker of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Git subcommand and arguments, split on whitespace at run time.
    pub command: String,
    /// Use the worker pool instead of a sequential loop.
    pub parallel: bool,
    /// Size of the worker pool.
    pub max_workers: usize,
    /// Bound applied to each git invocation separately.
    pub timeout: Duration,
    /// Skip `pull` on repositories with uncommitted changes.
    pub ignore_dirty: bool,
    /// Turn `pull` into a pull of every remote branch.
    pub all_branches: bool,
    pub verbose: bool,
}

impl ExecutionConfig {
    /// A default configuration running `command`.
    pub fn for_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Check the bounds the engine relies on.
    ///
    /// The engine itself assumes these hold; callers building a config from
    /// user input should validate before scheduling.
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "Git command cannot be empty".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig {
                message: "Number of workers must be positive".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig {
                message: "Timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// True when this run is a plain `pull`, the only command the dirty-check
    /// and all-branches switches apply to.
    pub fn is_pull(&self) -> bool {
        self.command.trim() == "pull"
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            parallel: true,
            max_workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            ignore_dirty: false,
            all_branches: false,
            verbose: false,
        }
    }
}
