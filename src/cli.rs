//! CLI argument parsing and dispatch

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::commands;
use rgp::output::OutputConfig;

const EXAMPLES: &str = "\
Examples:
  rgp --path ./workspace --command pull
  rgp --path ./projects --command status --parallel false
  rgp --path ./repos --command pull --all-branches
  rgp --include '*-service' --exclude 'test-*'";

/// Recursive Git Pull - Execute Git commands recursively on multiple repositories
#[derive(Parser, Debug)]
#[command(name = "rgp")]
#[command(version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    #[command(flatten)]
    run: commands::run::RunArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);
        commands::run::execute(self.run, output)
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialisation (tests) is harmless.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
