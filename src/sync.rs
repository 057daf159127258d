//! # Get Workflow
//!
//! Brings the workspace in line with a request snapshot:
//!
//! 1. Compute the missing set: request records no layer contains.
//! 2. Drop packages matching the optional exclusion pattern.
//! 3. Merge the remainder into the top snapshot. A conflict aborts here,
//!    before anything is fetched or written.
//! 4. Fetch the missing dependencies below the top root.
//! 5. Save the top snapshot, only once every fetch has succeeded.
//!
//! Steps 3 to 5 work on a copy of the top snapshot that replaces the loaded
//! one only after the save. On error the hierarchy is unchanged and can be
//! queried or retried.

use log::info;
use regex::Regex;

use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::hierarchy::SnapshotHierarchy;
use crate::snapshot::Snapshot;
use crate::vcs::{CommandRunner, VcsRegistry};

/// Options for `get`.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Packages matching this pattern are left out of the missing set.
    pub exclude: Option<Regex>,
    /// Validate the merge without fetching or writing anything.
    pub dry_run: bool,
}

/// Result of `get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    /// Every requested dependency is already satisfied.
    UpToDate,
    /// Dry run: these dependencies would be fetched.
    Planned { missing: Vec<Dependency> },
    /// The dependencies were fetched and the top snapshot saved.
    Fetched {
        outcomes: Vec<FetchOutcome>,
        revision: u64,
    },
}

/// Returns the dependencies of `request` that `hierarchy` does not satisfy,
/// minus any package matched by `exclude`.
pub fn missing(
    hierarchy: &SnapshotHierarchy,
    request: &Snapshot,
    exclude: Option<&Regex>,
) -> Vec<Dependency> {
    let mut missing = hierarchy.missing(request);
    if let Some(exclude) = exclude {
        missing.retain(|dep| !exclude.is_match(&dep.package));
    }
    missing
}

/// Merges `request` into the top layer of `hierarchy` and fetches what is
/// missing.
pub fn get(
    hierarchy: &mut SnapshotHierarchy,
    request: &Snapshot,
    options: &GetOptions,
    registry: &VcsRegistry,
    runner: &dyn CommandRunner,
) -> Result<GetOutcome> {
    let missing = missing(hierarchy, request, options.exclude.as_ref());
    if missing.is_empty() {
        return Ok(GetOutcome::UpToDate);
    }

    let top = hierarchy.top_mut().ok_or_else(|| Error::SearchPath {
        entry: String::new(),
        message: "search path is empty".to_string(),
    })?;

    // The merge is staged on a copy so a failed fetch or save leaves the
    // top layer as it was loaded.
    let mut merged = top.clone();
    merged.update(request.name(), &missing)?;
    if options.dry_run {
        return Ok(GetOutcome::Planned { missing });
    }
    info!("{}", merged.file().display());

    let outcomes = Fetcher::new(registry, runner).fetch_all(merged.root(), &missing)?;
    merged.save()?;

    let revision = merged.revision();
    *top = merged;
    Ok(GetOutcome::Fetched { outcomes, revision })
}
