//! # Git Process Layer
//!
//! Every interaction with the outside world goes through this module: it
//! spawns the system `git` binary inside a repository directory and captures
//! what it prints.
//!
//! Using the system binary means authentication works the way the user has
//! already configured it (SSH agent, credential helpers, `~/.gitconfig`).
//!
//! ## Deadlines
//!
//! [`SystemGit::run`] accepts an optional timeout. The child is polled with
//! `try_wait` while two reader threads drain its stdout and stderr, so a chatty
//! process can never block on a full pipe. When the deadline passes only that
//! child is killed, and the caller receives [`GitError::TimedOut`] together
//! with whatever output had been captured so far.
//!
//! The [`GitOperations`] trait is the seam the rest of the crate depends on,
//! which lets tests substitute scripted responses for real processes.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, trace};
use thiserror::Error;

use crate::duration::format_duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Text captured from a finished (or killed) git process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Standard output only.
    pub stdout: String,
    /// Standard output and standard error, interleaved in arrival order.
    pub combined: String,
}

impl GitOutput {
    /// Output where stdout and the combined stream are the same text.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        let stdout = stdout.into();
        Self {
            combined: stdout.clone(),
            stdout,
        }
    }
}

/// Why a git invocation did not succeed.
#[derive(Error, Debug)]
pub enum GitError {
    /// The process could not be started or waited on.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process outlived its deadline and was killed.
    #[error("timed out after {}", format_duration(*after))]
    TimedOut { after: Duration, output: GitOutput },

    /// The process ran and exited unsuccessfully. The message is the exit
    /// status alone; what the process printed stays in `stderr` and `output`.
    #[error("{}", describe_exit(*code))]
    Failed {
        code: Option<i32>,
        stderr: String,
        output: GitOutput,
    },
}

impl GitError {
    /// Output captured before the failure, if the process ran at all.
    pub fn output(&self) -> Option<&GitOutput> {
        match self {
            GitError::Spawn { .. } => None,
            GitError::TimedOut { output, .. } | GitError::Failed { output, .. } => Some(output),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GitError::TimedOut { .. })
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Runs git with `args` inside `dir`.
    ///
    /// With `timeout` set, the process is killed once the bound elapses and
    /// [`GitError::TimedOut`] is returned. Without it the call waits for as
    /// long as the process runs.
    fn run(&self, dir: &Path, args: &[&str], timeout: Option<Duration>)
        -> Result<GitOutput, GitError>;
}

/// The default implementation of `GitOperations`, which spawns the system's
/// `git` command.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a different executable in place of `git`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOperations for SystemGit {
    fn run(
        &self,
        dir: &Path,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<GitOutput, GitError> {
        debug!(
            "running '{} {}' in {}",
            self.program_name(),
            args.join(" "),
            dir.display()
        );

        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                program: self.program_name(),
                source,
            })?;

        let capture = Capture::start(&mut child);
        let deadline = timeout.map(|limit| (limit, Instant::now() + limit));

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Spawn {
                        program: self.program_name(),
                        source,
                    });
                }
            }

            if let Some((limit, deadline)) = deadline {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    debug!(
                        "killed '{} {}' in {} after {}",
                        self.program_name(),
                        args.join(" "),
                        dir.display(),
                        format_duration(limit)
                    );
                    // Reader threads are left to finish on their own: a
                    // grandchild may still hold the pipes open.
                    return Err(GitError::TimedOut {
                        after: limit,
                        output: capture.snapshot(),
                    });
                }
            }

            thread::sleep(POLL_INTERVAL);
        };

        let (output, stderr) = capture.finish();
        trace!("'{}' exited with {}", args.join(" "), status);

        if status.success() {
            Ok(output)
        } else {
            Err(GitError::Failed {
                code: status.code(),
                stderr,
                output,
            })
        }
    }
}

/// Reader threads draining a child's pipes.
struct Capture {
    stdout: Option<JoinHandle<Vec<u8>>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
    combined: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    fn start(child: &mut std::process::Child) -> Self {
        let combined = Arc::new(Mutex::new(Vec::new()));
        Self {
            stdout: child
                .stdout
                .take()
                .map(|pipe| drain(pipe, Arc::clone(&combined))),
            stderr: child
                .stderr
                .take()
                .map(|pipe| drain(pipe, Arc::clone(&combined))),
            combined,
        }
    }

    /// Combined output captured so far, without waiting for the readers.
    fn snapshot(&self) -> GitOutput {
        GitOutput {
            stdout: String::new(),
            combined: lossy(&lock_bytes(&self.combined)),
        }
    }

    /// Waits for both readers and returns the output plus stderr.
    fn finish(self) -> (GitOutput, String) {
        let stdout = join(self.stdout);
        let stderr = join(self.stderr);
        let combined = lock_bytes(&self.combined);
        (
            GitOutput {
                stdout: lossy(&stdout),
                combined: lossy(&combined),
            },
            lossy(&stderr),
        )
    }
}

fn drain<R>(mut reader: R, combined: Arc<Mutex<Vec<u8>>>) -> JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut own = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    own.extend_from_slice(&buf[..n]);
                    let mut all = combined.lock().unwrap_or_else(|p| p.into_inner());
                    all.extend_from_slice(&buf[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        own
    })
}

fn join(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

fn lock_bytes(buf: &Mutex<Vec<u8>>) -> Vec<u8> {
    buf.lock().unwrap_or_else(|p| p.into_inner()).clone()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
