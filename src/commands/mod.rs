//! # CLI Command Implementations
//!
//! Each subcommand of the `depsnap` command-line tool lives in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` together with the
//!   snapshot hierarchy built from the search path, and calls into the
//!   `depsnap` library to do the work.

pub mod completions;
pub mod get;
pub mod list;
