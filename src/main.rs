//! # rgp
//!
//! This is the binary entry point for the `rgp` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the requested Git command across the discovered repositories.
//! - Translating the run's outcomes into an exit code.
//!
//! The engine lives in the `rgp` library crate; the binary is a thin wrapper
//! around it.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    cli.execute()
}
