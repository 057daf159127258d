//! # depsnap
//!
//! This library records, per workspace layer, which external source packages
//! a project needs (package, ref, source URL) and fetches them into a local
//! source tree with a version-control tool. It is used by the `depsnap`
//! command-line tool but has no dependency on the CLI.
//!
//! ## Quick Example
//!
//! ```
//! use depsnap::dependency::Dependency;
//! use depsnap::snapshot::Snapshot;
//!
//! let mut snapshot = Snapshot::parse("name: app\nversion: 3\n", "/work/.depsnap.yaml").unwrap();
//! snapshot
//!     .update("app", &[Dependency::new("libA", "v1", "https://example.com/libA")])
//!     .unwrap();
//!
//! assert_eq!(snapshot.revision(), 4);
//! assert!(snapshot.contains(&Dependency::new("libA", "v1", "")));
//! ```
//!
//! ## Core Concepts
//!
//! - **Dependency records (`dependency`)**: a package identifier, a ref and a
//!   source URL. A ref with the `sha:` prefix names an exact commit.
//! - **Snapshots (`snapshot`)**: one `.depsnap.yaml` document with a name, a
//!   revision counter and an ordered list of dependencies.
//! - **Hierarchy (`hierarchy`)**: the snapshots found along the search path.
//!   The first one is the top layer, the only one that is written to.
//! - **Drivers (`vcs`)**: templated command lines for one version-control
//!   tool, chosen by URL scheme.
//! - **Fetching (`fetch`)**: creates or resets checkouts under `<root>/src`.
//! - **Get workflow (`sync`)**: ties the above together for the `get`
//!   command.
//!
//! ## Execution Flow
//!
//! 1. Build the hierarchy from the search path.
//! 2. Load the request snapshot and compute the missing set.
//! 3. Merge the missing set into the top snapshot, failing on conflicts.
//! 4. Fetch each missing dependency in order.
//! 5. Save the top snapshot.
//!
//! Everything runs sequentially on the calling thread.

pub mod defaults;
pub mod dependency;
pub mod error;
pub mod fetch;
pub mod hierarchy;
pub mod output;
pub mod snapshot;
pub mod suggestions;
pub mod sync;
pub mod vcs;

#[cfg(test)]
mod snapshot_proptest;
