//! Dirty working-tree check used to veto `pull`.

use std::path::Path;

use crate::git::{GitError, GitOperations};

/// Arguments of the machine-readable status query.
pub const STATUS_ARGS: [&str; 2] = ["status", "--porcelain"];

/// Returns true when the working tree at `path` has uncommitted changes.
///
/// The status query is short-lived and runs without a deadline. Errors are
/// passed through unchanged.
pub fn is_dirty(git: &dyn GitOperations, path: &Path) -> Result<bool, GitError> {
    let output = git.run(path, &STATUS_ARGS, None)?;
    Ok(!output.stdout.trim().is_empty())
}
