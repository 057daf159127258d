//! CLI argument parsing and command dispatch

use std::ffi::OsString;

use anyhow::Result;
use clap::{Parser, Subcommand};

use depsnap::defaults::SEARCH_PATH_ENV;
use depsnap::hierarchy::SnapshotHierarchy;
use depsnap::output::OutputConfig;
use depsnap::suggestions;

use crate::commands;

/// depsnap - record dependency snapshots per workspace layer and fetch them
#[derive(Parser, Debug)]
#[command(name = "depsnap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Search path: absolute directories, most specific first
    #[arg(long, global = true, value_name = "PATHS", env = SEARCH_PATH_ENV)]
    search_path: Option<OsString>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the dependencies declared in a snapshot file into the top layer
    Get(commands::get::GetArgs),

    /// List every layer of the search path and its dependencies
    List,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Get(args) => {
                let mut hierarchy = load_hierarchy(self.search_path)?;
                commands::get::execute(args, &mut hierarchy, &output)
            }
            Commands::List => {
                let hierarchy = load_hierarchy(self.search_path)?;
                commands::list::execute(&hierarchy)
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Routes `log` records to stderr as bare `[LEVEL] message` lines.
///
/// `RUST_LOG`, when set, overrides `--log-level`.
fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Info);
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

fn load_hierarchy(search_path: Option<OsString>) -> Result<SnapshotHierarchy> {
    let search_path = search_path.ok_or_else(suggestions::search_path_unset)?;
    let hierarchy = SnapshotHierarchy::from_search_path(&search_path)?;
    if hierarchy.top().is_none() {
        return Err(suggestions::search_path_unset());
    }
    Ok(hierarchy)
}
