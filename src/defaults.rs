//! Default values for depsnap.
//!
//! This module provides centralized default values used across the library
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Name of the snapshot file inside every search-path root.
pub const SNAPSHOT_FILENAME: &str = ".depsnap.yaml";

/// Environment variable holding the search path.
pub const SEARCH_PATH_ENV: &str = "DEPSNAP_PATH";

/// Directory under a root where dependencies are checked out.
pub const SOURCE_DIR: &str = "src";

/// Prefix marking a ref as an exact commit rather than a branch or tag.
pub const COMMIT_PREFIX: &str = "sha:";

/// Returns the snapshot file path for a search-path root.
pub fn snapshot_path(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_FILENAME)
}

/// Returns where `package` is checked out below `root`.
pub fn checkout_path(root: &Path, package: &str) -> PathBuf {
    root.join(SOURCE_DIR).join(package)
}
