//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depsnap::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Request file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::request_not_found(path));
//! ```

use std::path::Path;

use crate::defaults::{SEARCH_PATH_ENV, SNAPSHOT_FILENAME};

/// Generate an error for when the request snapshot passed to `get` is missing.
pub fn request_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Request file not found: {path}\n\n\
         hint: Pass the path of a {SNAPSHOT_FILENAME} file listing the dependencies to fetch\n\
         hint: Run 'depsnap list' to see what is already recorded",
        path = path.display()
    )
}

/// Generate an error for when no search path is configured.
pub fn search_path_unset() -> anyhow::Error {
    anyhow::anyhow!(
        "Search path is empty\n\n\
         hint: Set {SEARCH_PATH_ENV} to one or more absolute directories\n\
         hint: Use --search-path to pass it on the command line"
    )
}

/// Generate an error for an invalid `--exclude` pattern.
///
/// Includes hints about common regex mistakes.
pub fn invalid_exclude(pattern: &str, error: &regex::Error) -> anyhow::Error {
    let hint = match error {
        regex::Error::Syntax(msg) if msg.contains("unclosed") => {
            "hint: Check for unclosed brackets, parentheses, or braces"
        }
        regex::Error::Syntax(msg) if msg.contains("repetition") => {
            "hint: Repetition operators (+, *, ?) must follow a pattern"
        }
        _ => "hint: The pattern is matched against package names",
    };

    anyhow::anyhow!(
        "Invalid exclude pattern: {pattern}\n\
         error: {error}\n\n\
         {hint}\n\
         hint: Test patterns at https://regex101.com (select Rust flavor)"
    )
}

/// Generate an error for a version conflict between the request and the top
/// snapshot.
pub fn conflict(package: &str, existing: &str, new: &str, top: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Conflict: {package}, existing - {existing}, new - {new}\n\n\
         hint: Request {package} at {existing} to reuse the recorded checkout\n\
         hint: Or edit {top} if {new} should replace it",
        top = top.display()
    )
}
