//! # Repository Discovery
//!
//! Walks a root directory and reports every directory that contains a `.git`
//! directory as a [`RepositoryDescriptor`].
//!
//! ## Walk rules
//!
//! - Entries are visited in file-name order, so discovery is deterministic.
//! - Symbolic links are not followed.
//! - `.git` directories are never descended into, but the walk continues
//!   through the rest of a repository, so nested repositories are found too.
//! - Unreadable directories below the root are logged and skipped.
//!
//! ## Filtering
//!
//! [`RepositoryFilter`] matches glob patterns against the repository *name*
//! (the directory's base name). When include patterns are given a repository
//! must match at least one; any matching exclude pattern removes it.

use std::path::Path;

use glob::Pattern;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::repository::RepositoryDescriptor;

const GIT_DIR: &str = ".git";

/// Include/exclude patterns applied to repository names.
#[derive(Debug, Clone, Default)]
pub struct RepositoryFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl RepositoryFilter {
    /// Compile the patterns. Blank patterns are ignored.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// A filter that accepts every repository.
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn accepts(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(name)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(name))
    }
}

fn compile<I, S>(patterns: I) -> Result<Vec<Pattern>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .map(|p| Pattern::new(&p).map_err(Error::from))
        .collect()
}

/// Find every git repository under `root` that `filter` accepts.
pub fn find_repositories(root: &Path, filter: &RepositoryFilter) -> Result<Vec<RepositoryDescriptor>> {
    check_root(root)?;

    let mut repositories = Vec::new();
    let mut walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if !entry.file_type().is_dir() || entry.file_name() != GIT_DIR {
            continue;
        }
        walker.skip_current_dir();

        let Some(repo_path) = entry.path().parent() else {
            continue;
        };
        let repo = RepositoryDescriptor::from_path(repo_path);
        if filter.accepts(&repo.name) {
            debug!("found repository {}", repo);
            repositories.push(repo);
        } else {
            debug!("filtered out repository {}", repo);
        }
    }

    Ok(repositories)
}

fn check_root(root: &Path) -> Result<()> {
    let metadata = std::fs::metadata(root).map_err(|e| Error::InvalidRoot {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;
    if !metadata.is_dir() {
        return Err(Error::InvalidRoot {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }
    Ok(())
}
