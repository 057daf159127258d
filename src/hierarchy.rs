//! # Snapshot Hierarchy
//!
//! The hierarchy is the ordered set of snapshots found along the search
//! path, one per root. The first layer is the "top": it is the only layer
//! that merges are written into. Every layer takes part in containment
//! queries, so a dependency declared anywhere on the path is considered
//! satisfied.
//!
//! ## Building
//!
//! `SnapshotHierarchy::from_search_path` validates each entry, then calls
//! `append` with the entry's snapshot file:
//!
//! - A missing file becomes an empty layer bound to that path. For the first
//!   entry this empty layer is the writable top.
//! - A malformed first file also becomes an empty top, with a warning, so the
//!   hierarchy always has somewhere to write.
//! - Any other failure is returned and the layer is skipped.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::warn;

use crate::defaults::snapshot_path;
use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;

/// The snapshots found along a search path, most specific first.
#[derive(Debug, Default)]
pub struct SnapshotHierarchy {
    layers: Vec<Snapshot>,
}

impl SnapshotHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hierarchy from a platform path list such as `DEPSNAP_PATH`.
    ///
    /// Empty entries are skipped. Entries starting with `~` or that are not
    /// absolute are rejected with `Error::SearchPath`.
    pub fn from_search_path(search_path: &OsStr) -> Result<Self> {
        let roots = parse_search_path(search_path)?;
        Self::from_roots(&roots)
    }

    /// Builds a hierarchy from already-validated root directories.
    pub fn from_roots(roots: &[PathBuf]) -> Result<Self> {
        let mut hierarchy = Self::new();
        for root in roots {
            hierarchy.append(snapshot_path(root))?;
        }
        Ok(hierarchy)
    }

    /// Loads the snapshot at `path` and adds it as the next layer.
    pub fn append(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let is_first = self.layers.is_empty();

        let snapshot = match Snapshot::load(path) {
            Ok(snapshot) => snapshot,
            Err(Error::NotFound { .. }) => Snapshot::new(path),
            Err(Error::Format { message, .. }) if is_first => {
                warn!(
                    "ignoring malformed snapshot {}: {}",
                    path.display(),
                    message
                );
                Snapshot::new(path)
            }
            Err(e) => return Err(e),
        };

        self.layers.push(snapshot);
        Ok(())
    }

    /// The first, writable layer.
    pub fn top(&self) -> Option<&Snapshot> {
        self.layers.first()
    }

    pub fn top_mut(&mut self) -> Option<&mut Snapshot> {
        self.layers.first_mut()
    }

    /// True when any layer contains `dep`.
    pub fn contains(&self, dep: &Dependency) -> bool {
        self.layers.iter().any(|layer| layer.contains(dep))
    }

    /// The records of `request` that no layer contains, in request order.
    pub fn missing(&self, request: &Snapshot) -> Vec<Dependency> {
        request
            .dependencies()
            .iter()
            .filter(|dep| !self.contains(dep))
            .cloned()
            .collect()
    }

    pub fn layers(&self) -> &[Snapshot] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Splits and validates a platform path list.
pub fn parse_search_path(search_path: &OsStr) -> Result<Vec<PathBuf>> {
    let mut roots = Vec::new();
    for entry in std::env::split_paths(search_path) {
        if entry.as_os_str().is_empty() {
            continue;
        }
        let display = entry.to_string_lossy().into_owned();
        if display.starts_with('~') {
            return Err(Error::SearchPath {
                entry: display,
                message: "entry cannot start with shell metacharacter '~'".to_string(),
            });
        }
        if !entry.is_absolute() {
            return Err(Error::SearchPath {
                entry: display,
                message: "entry is relative; must be an absolute path".to_string(),
            });
        }
        roots.push(entry);
    }
    Ok(roots)
}
