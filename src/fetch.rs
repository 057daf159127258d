//! # Fetch Orchestration
//!
//! Materializes a list of missing dependencies under `<root>/src/<package>`,
//! strictly in the order given. Each destination falls into one of three
//! cases:
//!
//! 1. It carries the driver's metadata directory: it is an existing checkout
//!    that the snapshot does not know about. A warning is logged, updates are
//!    fetched, and the checkout is forced to the requested ref. Local changes
//!    in that checkout are not preserved.
//! 2. It exists without metadata: the batch fails with
//!    `Error::UnmanagedDestination` and nothing is run for it.
//! 3. It does not exist: its parent directories are created and the driver
//!    creates a fresh checkout.
//!
//! The first failure aborts the batch. Checkouts created before the failure
//! stay on disk. The orchestrator never touches snapshot state; committing
//! the merge is up to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::defaults::checkout_path;
use crate::dependency::Dependency;
use crate::error::{Error, Result};
use crate::vcs::{CommandRunner, VcsRegistry};

/// What happened to one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A fresh checkout was created at `path`.
    Created { package: String, path: PathBuf },
    /// An existing checkout at `path` was reset to the requested ref.
    Reset { package: String, path: PathBuf },
}

impl FetchOutcome {
    pub fn package(&self) -> &str {
        match self {
            FetchOutcome::Created { package, .. } | FetchOutcome::Reset { package, .. } => package,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::Created { path, .. } | FetchOutcome::Reset { path, .. } => path,
        }
    }
}

/// Drives version-control tools to materialize dependencies.
pub struct Fetcher<'a> {
    registry: &'a VcsRegistry,
    runner: &'a dyn CommandRunner,
}

impl<'a> Fetcher<'a> {
    pub fn new(registry: &'a VcsRegistry, runner: &'a dyn CommandRunner) -> Self {
        Self { registry, runner }
    }

    /// Fetches every dependency in `deps` below `root`, stopping at the first
    /// failure.
    pub fn fetch_all(&self, root: &Path, deps: &[Dependency]) -> Result<Vec<FetchOutcome>> {
        deps.iter().map(|dep| self.fetch_one(root, dep)).collect()
    }

    /// Fetches a single dependency below `root`.
    ///
    /// A package identifier that would resolve outside `<root>/src` is
    /// rejected before anything touches the disk.
    pub fn fetch_one(&self, root: &Path, dep: &Dependency) -> Result<FetchOutcome> {
        dep.validate()?;
        let dst = checkout_path(root, &dep.package);
        let driver = self.registry.for_url(&dep.url);

        if driver.exists(&dst) {
            warn!("unmanaged checkout '{}', resetting to {}", dst.display(), dep.r#ref);
            driver.fetch(self.runner, &dst)?;
            driver.checkout(self.runner, &dst, &dep.r#ref)?;
            return Ok(FetchOutcome::Reset {
                package: dep.package.clone(),
                path: dst,
            });
        }

        if dst.exists() {
            return Err(Error::UnmanagedDestination { path: dst });
        }

        info!("creating new checkout '{}' at {}", dst.display(), dep.r#ref);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        driver.create(self.runner, &dst, &dep.url, &dep.r#ref)?;
        Ok(FetchOutcome::Created {
            package: dep.package.clone(),
            path: dst,
        })
    }
}
