//! # Execution Outcomes
//!
//! One [`ExecutionOutcome`] records what happened when a command was run
//! against one repository. A worker builds it, hands it to the collector, and
//! from then on it is only read.
//!
//! Failures carry a [`FailureKind`] tag next to their message. Downstream
//! code (the reporter in particular) decides how to present a failure from the
//! tag alone; message text is for humans.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::repository::RepositoryDescriptor;

/// What kind of failure an outcome records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A helper invocation (status check, branch listing) could not complete.
    Tooling,
    /// The operation was deliberately not attempted: the working tree had
    /// uncommitted changes. A soft failure.
    Skipped,
    /// A bounded invocation outlived its deadline.
    Timeout,
    /// Git ran the requested command and reported failure.
    Command,
    /// One branch of a multi-branch pull failed.
    Branch,
}

impl FailureKind {
    pub fn is_skip(self) -> bool {
        self == FailureKind::Skipped
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Tooling => "tooling error",
            FailureKind::Skipped => "skipped",
            FailureKind::Timeout => "timeout",
            FailureKind::Command => "command failed",
            FailureKind::Branch => "branch pull failed",
        };
        f.write_str(label)
    }
}

/// A tagged failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeError {
    pub kind: FailureKind,
    pub message: String,
}

impl OutcomeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The recorded result of one command against one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub repository: RepositoryDescriptor,
    /// Label of what ran, e.g. `status` or `pull --all`.
    pub command: String,
    pub succeeded: bool,
    pub output: String,
    pub error: Option<OutcomeError>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ExecutionOutcome {
    pub fn success(
        repository: RepositoryDescriptor,
        command: impl Into<String>,
        output: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            repository,
            command: command.into(),
            succeeded: true,
            output: output.into(),
            error: None,
            duration,
        }
    }

    pub fn failure(
        repository: RepositoryDescriptor,
        command: impl Into<String>,
        output: impl Into<String>,
        error: OutcomeError,
        duration: Duration,
    ) -> Self {
        Self {
            repository,
            command: command.into(),
            succeeded: false,
            output: output.into(),
            error: Some(error),
            duration,
        }
    }

    /// The failure message, or an empty string on success.
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map(|e| e.message.as_str()).unwrap_or("")
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn is_skipped(&self) -> bool {
        self.failure_kind().is_some_and(FailureKind::is_skip)
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}
