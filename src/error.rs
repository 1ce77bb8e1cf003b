//! # Error Handling
//!
//! This module defines the crate-level error type for `rgp`. It uses the
//! `thiserror` library to describe every failure that can stop a run before or
//! around the execution engine.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries enough context to print
//!   a useful message without further decoration.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Failures of an individual repository are *not* represented here. Those are
//! recovered at repository scope and recorded in the repository's
//! [`ExecutionOutcome`](crate::outcome::ExecutionOutcome), so one broken
//! repository never aborts the batch. The variants below cover the conditions
//! that belong to the collaborators around the engine:
//!
//! - Invalid root path for discovery.
//! - Invalid duration strings and configuration values.
//! - Glob pattern and directory walk errors.
//! - Worker pool construction.
//! - JSON serialization of the summary.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rgp operations
#[derive(Error, Debug)]
pub enum Error {
    /// The discovery root does not exist or is not a directory.
    #[error("Invalid path '{}': {message}", path.display())]
    InvalidRoot { path: PathBuf, message: String },

    /// A duration string such as `30s` or `1m30s` could not be parsed.
    #[error("Invalid duration '{input}': {message}")]
    InvalidDuration { input: String, message: String },

    /// A configuration value violates its documented bounds.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The bounded worker pool could not be created.
    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
