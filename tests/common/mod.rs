//! Shared test utilities for integration and E2E tests.
//!
//! This module provides workspace fixtures, a recording command runner and
//! helpers for building real git repositories, to reduce duplication across
//! test files.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = Workspace::new().with_top(snapshots::APP);
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

use depsnap::vcs::{CommandOutput, CommandRunner};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::snapshots;
    pub use super::{checked_out_version, git_available, GitSource, RecordingRunner, Workspace};
}

/// Snapshot documents used across tests.
#[allow(dead_code)]
pub mod snapshots {
    /// Top layer declaring `libA@v1`.
    pub const APP: &str = r#"name: app
version: 3
dependencies:
  - package: libA
    version: v1
    url: https://x/libA
"#;

    /// Secondary layer declaring `libShared@v5`.
    pub const SHARED: &str = r#"name: shared
version: 1
dependencies:
  - package: libShared
    version: v5
    url: https://x/libShared
"#;

    /// Request for `libA@v1` and `libB@v2`.
    pub const REQUEST_A1_B2: &str = r#"name: request
dependencies:
  - package: libA
    version: v1
    url: https://x/libA
  - package: libB
    version: v2
    url: https://x/libB
"#;

    /// Request for `libA@v2`, conflicting with `APP`.
    pub const REQUEST_A2: &str = r#"name: request
dependencies:
  - package: libC
    version: v1
    url: https://x/libC
  - package: libA
    version: v2
    url: https://x/libA
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "dependencies: [unclosed";
}

/// A temporary workspace with a top layer, an optional secondary layer and
/// room for request files.
pub struct Workspace {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl Workspace {
    /// Create a workspace with empty `top/` and `shared/` roots.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir.child("top").create_dir_all().unwrap();
        temp_dir.child("shared").create_dir_all().unwrap();
        Self { temp_dir }
    }

    /// Write the top layer's snapshot file.
    pub fn with_top(self, content: &str) -> Self {
        self.temp_dir
            .child("top/.depsnap.yaml")
            .write_str(content)
            .expect("Failed to write top snapshot");
        self
    }

    /// Write the secondary layer's snapshot file.
    pub fn with_shared(self, content: &str) -> Self {
        self.temp_dir
            .child("shared/.depsnap.yaml")
            .write_str(content)
            .expect("Failed to write shared snapshot");
        self
    }

    /// Write a request file and return its path.
    pub fn request(&self, content: &str) -> PathBuf {
        let child = self.temp_dir.child("request.yaml");
        child.write_str(content).expect("Failed to write request");
        child.path().to_path_buf()
    }

    /// Create a directory below the workspace root.
    pub fn child_dir(&self, relative: &str) -> PathBuf {
        let child = self.temp_dir.child(relative);
        child.create_dir_all().expect("Failed to create directory");
        child.path().to_path_buf()
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn top(&self) -> PathBuf {
        self.path().join("top")
    }

    pub fn shared(&self) -> PathBuf {
        self.path().join("shared")
    }

    pub fn top_snapshot(&self) -> PathBuf {
        self.top().join(".depsnap.yaml")
    }

    /// The search path covering both roots, top first.
    pub fn search_path(&self) -> std::ffi::OsString {
        std::env::join_paths([self.top(), self.shared()]).unwrap()
    }

    /// Create a command running in this workspace with the search path set.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("depsnap");
        cmd.current_dir(self.path())
            .env("DEPSNAP_PATH", self.search_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// The library's recording runner, compiled into the test crate.
#[path = "../../src/vcs/fake.rs"]
mod fake;

pub use fake::RecordingRunner;

/// Whether a usable `git` binary is on `PATH`.
///
/// Tests that drive real git skip themselves when it is not.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// A local git repository with tagged commits, usable as a clone source.
#[allow(dead_code)]
pub struct GitSource {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl GitSource {
    /// Create a repository with one commit per tag in `tags`.
    pub fn with_tags(tags: &[&str]) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let source = Self { temp_dir };
        source.git(&["init", "--quiet"]);
        for tag in tags {
            source
                .temp_dir
                .child("VERSION")
                .write_str(tag)
                .expect("Failed to write VERSION");
            source.git(&["add", "VERSION"]);
            source.git(&["commit", "--quiet", "-m", tag]);
            source.git(&["tag", tag]);
        }
        source
    }

    pub fn url(&self) -> String {
        self.temp_dir.path().to_string_lossy().into_owned()
    }

    /// Hash of the commit a tag points at.
    pub fn commit_of(&self, tag: &str) -> String {
        let output = self.git(&["rev-list", "-n", "1", tag]);
        output.trim().to_string()
    }

    fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(["-c", "user.name=depsnap", "-c", "user.email=depsnap@example.com"])
            .args(args)
            .current_dir(self.temp_dir.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

/// Read the version recorded in a checkout's `VERSION` file.
#[allow(dead_code)]
pub fn checked_out_version(checkout: &Path) -> String {
    std::fs::read_to_string(checkout.join("VERSION")).expect("Failed to read VERSION")
}
