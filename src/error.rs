//! # Error Handling
//!
//! This module defines the error type shared by every part of the `depsnap`
//! library. It uses `thiserror` to build a single `Error` enum whose variants
//! map one-to-one onto the failure modes of the tool:
//!
//! - Snapshot files that are missing, unreadable, malformed or unwritable.
//! - Version conflicts detected while merging dependency declarations.
//! - A version-control binary that cannot be found, or that exits non-zero.
//! - Destinations that exist on disk but are not managed checkouts.
//! - Package identifiers that would escape the checkout directory.
//! - Invalid search-path entries.
//!
//! `Result<T>` is the usual alias for `std::result::Result<T, Error>`.
//!
//! The command layer converts these into `anyhow::Error` and prints a single
//! diagnostic line before exiting with a non-zero status.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for depsnap operations
#[derive(Error, Debug)]
pub enum Error {
    /// The snapshot file does not exist.
    ///
    /// Recoverable while building a hierarchy: the layer is treated as empty.
    #[error("Snapshot file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The snapshot file exists but cannot be read.
    #[error("Permission denied reading snapshot file: {}", path.display())]
    Permission { path: PathBuf },

    /// The snapshot file could not be deserialized.
    #[error("Malformed snapshot file {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// Any other I/O failure while reading a snapshot file.
    #[error("Cannot read snapshot file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be written (permissions, missing directory, I/O).
    #[error("Cannot write snapshot file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The same package is declared with two different refs.
    #[error("Conflict: {package}, existing - {existing}, new - {new}")]
    Conflict {
        package: String,
        existing: String,
        new: String,
    },

    /// The version-control binary is not installed or not on `PATH`.
    #[error("Missing {tool} command '{binary}'\n  hint: install {tool} and make sure '{binary}' is on your PATH")]
    ToolMissing { tool: String, binary: String },

    /// The version-control binary exited with a non-zero status.
    ///
    /// `output` holds the combined stdout and stderr of the process.
    #[error("{tool} command failed in {}: {command} ({status})\n{output}", dir.display())]
    Command {
        tool: String,
        command: String,
        dir: PathBuf,
        status: String,
        output: String,
    },

    /// The destination exists but does not carry version-control metadata.
    #[error("Destination {} already exists and is not a managed checkout\n  hint: move it out of the way or turn it into a checkout of the requested source", path.display())]
    UnmanagedDestination { path: PathBuf },

    /// A package identifier would not map to a directory below `src/`.
    #[error("Invalid package identifier {package:?}: {reason}")]
    InvalidPackage { package: String, reason: String },

    /// The snapshot revision cannot grow any further.
    #[error("Snapshot revision of {} is at its maximum", path.display())]
    RevisionOverflow { path: PathBuf },

    /// A search-path entry was rejected.
    #[error("Invalid search path entry {entry:?}: {message}")]
    SearchPath { entry: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
