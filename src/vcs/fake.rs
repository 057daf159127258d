//! A `CommandRunner` that records invocations instead of spawning them.
//!
//! Shared by the unit tests and by the integration tests under `tests/`,
//! which include this file through `#[path]`. The including module must
//! bring `CommandOutput` and `CommandRunner` into scope.

#![allow(dead_code)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn line(&self) -> String {
        self.args.join(" ")
    }
}

/// Records every call. `clone` calls create the target's `.git`
/// directory so later steps see a managed checkout.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Invocation>>,
    /// Calls whose argument line contains this string exit non-zero.
    pub fail_on: Option<String>,
    /// Every spawn fails as if the binary were not installed.
    pub tool_missing: bool,
}

impl RecordingRunner {
    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    /// The argument lines of every call, in order.
    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.line()).collect()
    }

    /// The working directory of every call, in order.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.dir.clone())
            .collect()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        if self.tool_missing {
            return Err(std::io::Error::new(ErrorKind::NotFound, "not found"));
        }
        let invocation = Invocation {
            dir: dir.to_path_buf(),
            program: program.to_string(),
            args: args.to_vec(),
        };
        let line = invocation.line();
        self.calls.lock().unwrap().push(invocation);

        if self.fail_on.as_ref().is_some_and(|p| line.contains(p.as_str())) {
            return Ok(CommandOutput {
                success: false,
                status: "exit status: 128".to_string(),
                output: format!("fatal: {line} failed\n"),
            });
        }
        if args.first().map(String::as_str) == Some("clone") {
            if let Some(target) = args.get(2) {
                fs::create_dir_all(Path::new(target).join(".git"))?;
            }
        }
        Ok(CommandOutput {
            success: true,
            status: "exit status: 0".to_string(),
            output: String::new(),
        })
    }
}
