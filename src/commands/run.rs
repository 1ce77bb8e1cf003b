//! # Run Command Implementation
//!
//! Discovers repositories under `--path`, runs `git <command>` in each of them
//! and prints a summary.
//!
//! ## Functionality
//!
//! - **Discovery**: every directory containing `.git`, filtered by
//!   `--include` / `--exclude` glob patterns on the repository name.
//! - **Execution**: sequential or parallel (`--parallel`, `--workers`), with a
//!   per-invocation `--timeout`. `--ignore-dirty` and `--all-branches` change
//!   how `pull` behaves.
//! - **Progress**: `--verbose` prints a line before and after every
//!   repository; otherwise a progress bar is drawn on stderr when it is a
//!   terminal.
//! - **Summary**: text (default) or JSON (`--format json`). The exit code is 1
//!   when any repository failed or was skipped.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use rgp::config::{ExecutionConfig, DEFAULT_COMMAND, DEFAULT_WORKERS};
use rgp::duration::{format_duration, parse_duration};
use rgp::git::SystemGit;
use rgp::locator::{find_repositories, RepositoryFilter};
use rgp::outcome::{ExecutionOutcome, FailureKind};
use rgp::output::{OutputConfig, Palette};
use rgp::report::Summary;
use rgp::repository::RepositoryDescriptor;
use rgp::runner::CommandRunner;
use rgp::scheduler::{ExecutionObserver, Scheduler};

/// Run a Git command in every repository below a directory
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root path to search for Git repositories.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Git command to execute, e.g. "pull" or "fetch --prune".
    #[arg(
        short,
        long,
        value_name = "COMMAND",
        default_value = DEFAULT_COMMAND,
        allow_hyphen_values = true
    )]
    pub command: String,

    /// Execute commands in parallel.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    pub parallel: bool,

    /// Maximum number of parallel workers.
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_WORKERS, env = "RGP_WORKERS")]
    pub workers: usize,

    /// Timeout for each git invocation (e.g. 30s, 1m30s, 500ms).
    #[arg(
        short,
        long,
        value_name = "DURATION",
        default_value = "30s",
        env = "RGP_TIMEOUT",
        value_parser = parse_timeout
    )]
    pub timeout: Duration,

    /// Skip `pull` in repositories with uncommitted changes.
    #[arg(long)]
    pub ignore_dirty: bool,

    /// Comma-separated patterns; only matching repositories are used.
    #[arg(long, value_name = "PATTERNS", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Comma-separated patterns; matching repositories are left out.
    #[arg(long, value_name = "PATTERNS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Print every invocation and its output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Pull all remote branches (only applies to the pull command).
    #[arg(long)]
    pub all_branches: bool,

    /// Summary format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// How the final summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// A single JSON document on stdout
    Json,
}

fn parse_timeout(input: &str) -> std::result::Result<Duration, String> {
    parse_duration(input).map_err(|e| e.to_string())
}

impl RunArgs {
    fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            command: self.command.trim().to_string(),
            parallel: self.parallel,
            max_workers: self.workers,
            timeout: self.timeout,
            ignore_dirty: self.ignore_dirty,
            all_branches: self.all_branches,
            verbose: self.verbose,
        }
    }
}

/// Execute the run command.
pub fn execute(args: RunArgs, output: OutputConfig) -> Result<ExitCode> {
    let palette = output.palette();
    let config = args.execution_config();
    config.validate()?;

    let filter = RepositoryFilter::new(&args.include, &args.exclude)
        .context("Invalid --include/--exclude pattern")?;
    let text = args.format == ReportFormat::Text;

    if text && config.verbose {
        print_header(&palette, &args, &config);
    }

    let repos = find_repositories(&args.path, &filter).context("Error finding repositories")?;

    if repos.is_empty() {
        if text {
            println!(
                "{} {}",
                palette.warning_icon(),
                palette.warning("No Git repositories found in the specified path.")
            );
        } else {
            println!("{}", Summary::new(Vec::new(), Duration::ZERO).render_json()?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if text {
        print_repositories(&palette, &repos);
    }

    let git = SystemGit::new();
    let scheduler = Scheduler::new(CommandRunner::new(&git, &config));
    let started = Instant::now();

    let outcomes = if text && config.verbose {
        scheduler.run(&repos, &VerbosePrinter { palette: &palette })?
    } else {
        let progress = ProgressObserver::new(repos.len() as u64);
        let outcomes = scheduler.run(&repos, &progress)?;
        progress.finish();
        outcomes
    };

    let summary = Summary::new(outcomes, started.elapsed());
    match args.format {
        ReportFormat::Text => print!("{}", summary.render_text(&palette, config.verbose)),
        ReportFormat::Json => println!("{}", summary.render_json()?),
    }

    Ok(ExitCode::from(summary.exit_code() as u8))
}

fn print_header(palette: &Palette, args: &RunArgs, config: &ExecutionConfig) {
    println!("{}", palette.bold("Starting recursive git command execution..."));
    println!(
        "{} {}",
        palette.info("Root path:"),
        palette.dim(args.path.display())
    );
    println!(
        "{} {}",
        palette.info("Command:"),
        palette.bold(format!("git {}", config.command))
    );
    println!("{} {}", palette.info("Parallel:"), palette.bold(config.parallel));
    if config.parallel {
        println!(
            "{} {}",
            palette.info("Max workers:"),
            palette.bold(config.max_workers)
        );
    }
    println!(
        "{} {}",
        palette.info("Timeout:"),
        palette.bold(format_duration(config.timeout))
    );
    println!();
}

fn print_repositories(palette: &Palette, repos: &[RepositoryDescriptor]) {
    println!(
        "{} {}",
        palette.success_icon(),
        palette.success(format!("Found {} repositories:", repos.len()))
    );
    for repo in repos {
        println!(
            "  {} {} {}",
            palette.info("•"),
            palette.bold(&repo.name),
            palette.dim(format!("({})", repo.path.display()))
        );
    }
    println!();
}

/// Prints a line before and a short report after every repository.
struct VerbosePrinter<'a> {
    palette: &'a Palette,
}

impl ExecutionObserver for VerbosePrinter<'_> {
    fn on_start(&self, repo: &RepositoryDescriptor, command: &str) {
        println!("Executing 'git {}' in {}...", command, repo.path.display());
    }

    fn on_finish(&self, outcome: &ExecutionOutcome) {
        let palette = self.palette;
        let icon = if outcome.succeeded {
            palette.success_icon()
        } else {
            palette.error_icon()
        };
        // Built up front so lines from concurrent workers do not interleave.
        let mut report = format!(
            "{} {} ({})\n",
            icon,
            outcome.repository.name,
            format_duration(outcome.duration)
        );
        if let Some(error) = &outcome.error {
            let message = match error.kind {
                FailureKind::Skipped => palette.warning(&error.message),
                _ => palette.error(&error.message),
            };
            report.push_str(&format!("  Error: {}\n", message));
        }
        let output = outcome.output.trim();
        if !output.is_empty() {
            report.push_str(&format!("  Output: {}\n", output));
        }
        print!("{}", report);
    }
}

/// Progress bar on stderr; hidden when stderr is not a terminal.
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ExecutionObserver for ProgressObserver {
    fn on_finish(&self, outcome: &ExecutionOutcome) {
        self.bar.set_message(outcome.repository.name.clone());
        self.bar.inc(1);
    }
}
