//! # Version-Control Drivers
//!
//! A `VcsDriver` describes how to drive one version-control tool through its
//! command line: how to create a fresh checkout, fetch updates into an
//! existing one, and check out a specific ref. Each step is a command-line
//! template with `{placeholder}` tokens.
//!
//! ## Template Rendering
//!
//! Templates are split on whitespace *before* placeholders are substituted,
//! and each token is expanded on its own. A value that contains spaces
//! therefore stays a single argument:
//!
//! ```
//! use depsnap::vcs::render;
//!
//! let args = render("clone {repo} {dir}", &[("repo", "u"), ("dir", "/my dir")]);
//! assert_eq!(args, vec!["clone", "u", "/my dir"]);
//! ```
//!
//! ## Running Commands
//!
//! Drivers never spawn processes themselves. They go through a
//! `CommandRunner`, which runs a program in a directory and captures its
//! combined output. `SystemRunner` uses `std::process::Command`; tests use a
//! recording runner instead.
//!
//! ## Driver Lookup
//!
//! `VcsRegistry` picks a driver from a dependency URL's scheme. Git is the
//! only registered driver and also the fallback for unknown schemes.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::dependency::RefSpec;
use crate::error::{Error, Result};

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Human-readable exit status, e.g. `exit status: 128`.
    pub status: String,
    /// Stdout followed by stderr.
    pub output: String,
}

/// Runs external programs - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` in `dir` and waits for it to exit.
    ///
    /// A spawn failure is returned as `Err`; a non-zero exit is not.
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// The default implementation of `CommandRunner`, which spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).current_dir(dir).output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            output: combined,
        })
    }
}

/// Describes how to use one version-control tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsDriver {
    /// Display name, e.g. `Git`.
    pub name: &'static str,
    /// Binary to invoke.
    pub binary: &'static str,
    /// Directory inside a checkout that marks it as managed by this tool.
    pub metadata_dir: &'static str,
    /// Creates a checkout of a branch or tag: `{repo}`, `{dir}`, `{branch}`.
    pub create_template: &'static str,
    /// Creates a checkout of the default branch: `{repo}`, `{dir}`.
    pub create_default_template: &'static str,
    /// Downloads updates into an existing checkout.
    pub fetch_template: &'static str,
    /// Switches an existing checkout to `{commit}`.
    pub checkout_template: &'static str,
}

/// Git.
pub static GIT: VcsDriver = VcsDriver {
    name: "Git",
    binary: "git",
    metadata_dir: ".git",
    create_template: "clone {repo} {dir} -b {branch}",
    create_default_template: "clone {repo} {dir}",
    fetch_template: "fetch --tags origin",
    checkout_template: "checkout {commit}",
};

impl VcsDriver {
    /// Creates a new checkout of `url` at `dst`.
    ///
    /// The parent of `dst` must exist; `dst` must not. A `sha:` ref clones
    /// the default branch and then checks out the commit.
    pub fn create(&self, runner: &dyn CommandRunner, dst: &Path, url: &str, r#ref: &str) -> Result<()> {
        let dir = parent_dir(dst);
        let dst_arg = dst.to_string_lossy();

        match RefSpec::parse(r#ref) {
            RefSpec::Named(branch) => self.run(
                runner,
                dir,
                self.create_template,
                &[("repo", url), ("dir", &*dst_arg), ("branch", branch)],
            ),
            RefSpec::Commit(commit) => {
                self.run(
                    runner,
                    dir,
                    self.create_default_template,
                    &[("repo", url), ("dir", &*dst_arg)],
                )?;
                self.run(runner, dst, self.checkout_template, &[("commit", commit)])
            }
        }
    }

    /// Checks out `r#ref` in the existing checkout at `dst`.
    pub fn checkout(&self, runner: &dyn CommandRunner, dst: &Path, r#ref: &str) -> Result<()> {
        let target = RefSpec::parse(r#ref).target();
        self.run(runner, dst, self.checkout_template, &[("commit", target)])
    }

    /// Downloads updates into the existing checkout at `dst`.
    pub fn fetch(&self, runner: &dyn CommandRunner, dst: &Path) -> Result<()> {
        self.run(runner, dst, self.fetch_template, &[])
    }

    /// True when `dst` carries this tool's metadata directory.
    pub fn exists(&self, dst: &Path) -> bool {
        dst.join(self.metadata_dir).is_dir()
    }

    fn run(
        &self,
        runner: &dyn CommandRunner,
        dir: &Path,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<()> {
        let args = render(template, vars);
        let command = std::iter::once(self.binary.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        debug!("# cd {}; {}", dir.display(), command);

        let output = runner.run(dir, self.binary, &args).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ToolMissing {
                    tool: self.name.to_string(),
                    binary: self.binary.to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        if !output.success {
            debug!("{}", output.output);
            return Err(Error::Command {
                tool: self.name.to_string(),
                command,
                dir: dir.to_path_buf(),
                status: output.status,
                output: output.output.trim_end().to_string(),
            });
        }
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Splits `template` into arguments and expands `{key}` in each one.
///
/// Unknown placeholders are left as they are. Substituted values are never
/// split or expanded again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| expand(token, vars))
        .collect()
}

fn expand(token: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Maps dependency URLs to the driver that fetches them.
#[derive(Debug, Clone)]
pub struct VcsRegistry {
    drivers: Vec<&'static VcsDriver>,
    schemes: Vec<(&'static str, &'static VcsDriver)>,
    fallback: &'static VcsDriver,
}

impl Default for VcsRegistry {
    fn default() -> Self {
        let mut registry = Self {
            drivers: Vec::new(),
            schemes: Vec::new(),
            fallback: &GIT,
        };
        registry.register(&GIT, &["https", "http", "ssh", "git", "git+ssh", "file"]);
        registry
    }
}

impl VcsRegistry {
    /// Registers `driver` for the given URL schemes.
    ///
    /// Later registrations take precedence for a scheme.
    pub fn register(&mut self, driver: &'static VcsDriver, schemes: &[&'static str]) {
        if !self.drivers.iter().any(|d| d.binary == driver.binary) {
            self.drivers.push(driver);
        }
        for scheme in schemes {
            self.schemes.insert(0, (*scheme, driver));
        }
    }

    /// Picks the driver for `url`, falling back to Git.
    pub fn for_url(&self, url: &str) -> &'static VcsDriver {
        scheme_of(url)
            .and_then(|scheme| {
                self.schemes
                    .iter()
                    .find(|(s, _)| *s == scheme)
                    .map(|(_, driver)| *driver)
            })
            .unwrap_or(self.fallback)
    }

    /// Looks up a driver by the name of its binary.
    pub fn by_binary(&self, binary: &str) -> Option<&'static VcsDriver> {
        self.drivers.iter().find(|d| d.binary == binary).copied()
    }

    pub fn drivers(&self) -> &[&'static VcsDriver] {
        &self.drivers
    }
}

/// Returns the URL scheme, treating scp-like `user@host:path` as `ssh`.
fn scheme_of(url: &str) -> Option<String> {
    if let Ok(parsed) = url::Url::parse(url) {
        return Some(parsed.scheme().to_string());
    }
    let (head, _) = url.split_once(':')?;
    if head.contains('@') && !head.contains('/') {
        Some("ssh".to_string())
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod fake;
