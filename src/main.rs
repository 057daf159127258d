//! # depsnap CLI
//!
//! This is the binary entry point for the `depsnap` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output styling.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The snapshot model and fetch logic live in the `depsnap` library crate;
//! the binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
