//! # Get Command Implementation
//!
//! This module implements the `get` subcommand, which reads a request
//! snapshot, works out which of its dependencies no layer of the search path
//! satisfies yet, checks them out under `<top>/src/<package>`, and records
//! them in the top snapshot.
//!
//! Nothing is written when the request conflicts with the top snapshot.
//! With `--dry-run` the merge is validated and the missing set printed, but
//! no command is run and no file is written.

use anyhow::Result;
use clap::Args;
use regex::Regex;
use std::path::PathBuf;

use depsnap::error::Error;
use depsnap::fetch::FetchOutcome;
use depsnap::hierarchy::SnapshotHierarchy;
use depsnap::output::{Marker, OutputConfig};
use depsnap::snapshot::Snapshot;
use depsnap::suggestions;
use depsnap::sync::{self, GetOptions, GetOutcome};
use depsnap::vcs::{SystemRunner, VcsRegistry};

/// Fetch the dependencies declared in a snapshot file
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Snapshot file listing the dependencies to fetch.
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    /// Skip packages whose name matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Show what would be fetched without running any command or writing files.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the `get` command.
pub fn execute(
    args: GetArgs,
    hierarchy: &mut SnapshotHierarchy,
    output: &OutputConfig,
) -> Result<()> {
    if !args.request.exists() {
        return Err(suggestions::request_not_found(&args.request));
    }
    let request = Snapshot::load(&args.request).map_err(|e| {
        anyhow::anyhow!(
            "Cannot load request file '{}': {}",
            args.request.display(),
            e
        )
    })?;

    let exclude = args
        .exclude
        .as_deref()
        .map(|pattern| Regex::new(pattern).map_err(|e| suggestions::invalid_exclude(pattern, &e)))
        .transpose()?;
    let options = GetOptions {
        exclude,
        dry_run: args.dry_run,
    };

    let top_file = hierarchy
        .top()
        .map(|top| top.file().to_path_buf())
        .unwrap_or_default();
    let outcome = sync::get(
        hierarchy,
        &request,
        &options,
        &VcsRegistry::default(),
        &SystemRunner,
    )
    .map_err(|e| match e {
        Error::Conflict {
            package,
            existing,
            new,
        } => suggestions::conflict(&package, &existing, &new, &top_file),
        other => anyhow::Error::new(other),
    })?;

    print_outcome(&outcome, hierarchy, output);
    Ok(())
}

fn print_outcome(outcome: &GetOutcome, hierarchy: &SnapshotHierarchy, output: &OutputConfig) {
    match outcome {
        GetOutcome::UpToDate => {
            println!("{} everything is up to date", output.marker(Marker::UpToDate));
        }
        GetOutcome::Planned { missing } => {
            for dep in missing {
                println!(
                    "{} {}@{} {}",
                    output.marker(Marker::Planned),
                    output.package(&dep.package),
                    dep.r#ref,
                    dep.url
                );
            }
            println!("{} package(s) would be fetched", missing.len());
        }
        GetOutcome::Fetched { outcomes, revision } => {
            for outcome in outcomes {
                let marker = match outcome {
                    FetchOutcome::Created { .. } => Marker::Created,
                    FetchOutcome::Reset { .. } => Marker::Reset,
                };
                println!(
                    "{} {} -> {}",
                    output.marker(marker),
                    output.package(outcome.package()),
                    outcome.path().display()
                );
            }
            if let Some(top) = hierarchy.top() {
                println!("{} updated to version {}", top.file().display(), revision);
            }
        }
    }
}
