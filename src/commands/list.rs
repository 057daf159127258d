//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which prints every layer of
//! the search path, most specific first, followed by the dependencies it
//! records:
//!
//! ```text
//! /work/.depsnap.yaml
//! 	 github.com/acme/lib  https://github.com/acme/lib  v1.2.0
//! ```
//!
//! This command is read-only.

use anyhow::Result;

use depsnap::hierarchy::SnapshotHierarchy;

/// Execute the `list` command.
pub fn execute(hierarchy: &SnapshotHierarchy) -> Result<()> {
    print!("{}", render(hierarchy));
    Ok(())
}

/// Formats every layer and its dependencies.
fn render(hierarchy: &SnapshotHierarchy) -> String {
    let mut out = String::new();
    for layer in hierarchy.layers() {
        out.push_str(&format!("{}\n", layer.file().display()));
        for dep in layer.dependencies() {
            out.push_str(&format!("\t {}  {}  {}\n", dep.package, dep.url, dep.r#ref));
        }
    }
    out
}
