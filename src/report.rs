//! # Run Summary
//!
//! Turns the scheduler's outcomes into what the user sees: a text summary or
//! a JSON document, plus the process exit code.
//!
//! Outcomes are sorted by repository name (ties broken by path) when the
//! [`Summary`] is built, so parallel and sequential runs print identically.
//! Presentation of a failure depends only on its [`FailureKind`]: skips are
//! shown as warnings, everything else as errors.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::duration::format_duration;
use crate::error::Result;
use crate::outcome::{ExecutionOutcome, FailureKind};
use crate::output::Palette;

/// The outcomes of one run, in presentation order.
#[derive(Debug, Clone)]
pub struct Summary {
    outcomes: Vec<ExecutionOutcome>,
    total: Duration,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    total: usize,
    succeeded: usize,
    failed: usize,
    skipped: usize,
    duration_ms: u64,
    outcomes: &'a [ExecutionOutcome],
}

impl Summary {
    pub fn new(mut outcomes: Vec<ExecutionOutcome>, total: Duration) -> Self {
        outcomes.sort_by(|a, b| {
            a.repository
                .name
                .cmp(&b.repository.name)
                .then_with(|| a.repository.path.cmp(&b.repository.path))
        });
        Self { outcomes, total }
    }

    pub fn outcomes(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    /// Number of unsuccessful outcomes, skips included.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// 0 when every repository succeeded, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed() == 0 {
            0
        } else {
            1
        }
    }

    /// Human-readable summary. `verbose` adds each repository's output.
    pub fn render_text(&self, palette: &Palette, verbose: bool) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", palette.bold("Summary:"));
        let _ = writeln!(out, "{}", palette.dim("========"));

        for outcome in &self.outcomes {
            let duration = palette.dim(format!("({})", format_duration(outcome.duration)));
            let name = &outcome.repository.name;

            if outcome.succeeded {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    palette.success_icon(),
                    palette.success(name),
                    duration
                );
            } else {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    palette.error_icon(),
                    palette.error(name),
                    duration
                );
                if let Some(error) = &outcome.error {
                    let line = match error.kind {
                        FailureKind::Skipped => format!(
                            "{} {}",
                            palette.warning_icon(),
                            palette.warning(&error.message)
                        ),
                        _ => format!(
                            "{} {}",
                            palette.error_icon(),
                            palette.error(&error.message)
                        ),
                    };
                    let _ = writeln!(out, "  {}", line);
                }
            }

            let output = outcome.output.trim();
            if verbose && !output.is_empty() {
                let _ = writeln!(out, "  {} {}", palette.info_icon(), palette.dim(output));
            }
        }

        let succeeded = self.succeeded();
        let failed = self.failed();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            palette.bold(format!(
                "Total: {} repositories processed in {}",
                self.outcomes.len(),
                format_duration(self.total)
            ))
        );
        if succeeded > 0 {
            let _ = writeln!(out, "{}", palette.success(format!("Successful: {}", succeeded)));
        }
        if failed > 0 {
            let skipped = self.skipped();
            let label = if skipped > 0 {
                format!("Failed: {} ({} skipped)", failed, skipped)
            } else {
                format!("Failed: {}", failed)
            };
            let _ = writeln!(out, "{}", palette.error(label));
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{} {}",
                palette.warning_icon(),
                palette.warning("Some repositories failed. Check the errors above.")
            );
        }

        out
    }

    /// Machine-readable summary.
    pub fn render_json(&self) -> Result<String> {
        let document = JsonSummary {
            total: self.outcomes.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            skipped: self.skipped(),
            duration_ms: self.total.as_millis() as u64,
            outcomes: &self.outcomes,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
