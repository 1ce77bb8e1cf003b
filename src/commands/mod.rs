//! # CLI Command Implementations
//!
//! `rgp` has a single command: run a Git command across repositories. It
//! follows the same layout other commands would:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and drives the `rgp`
//!   library.

pub mod run;
