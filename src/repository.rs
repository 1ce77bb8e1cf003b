//! Repository descriptors produced by discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Identifies one discovered working directory.
///
/// Descriptors are created once by the locator and then only read, so the
/// scheduler shares them by reference across workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub path: PathBuf,
}

impl RepositoryDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a descriptor named after the directory's base name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self { name, path }
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Base name of `path`, resolving `.` and friends through the filesystem.
fn base_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}
