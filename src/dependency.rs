//! # Dependency Records
//!
//! A `Dependency` names one external source package: its identifier, the ref
//! to check out, and the URL it is fetched from. In snapshot documents the ref
//! is stored under the `version` key.
//!
//! Two records are the same requirement when their package and ref match.
//! The URL is informational only and never compared.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::defaults::COMMIT_PREFIX;
use crate::error::{Error, Result};

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package identifier, also the checkout path below `src/`.
    pub package: String,
    /// Branch, tag or `sha:`-prefixed commit.
    #[serde(rename = "version")]
    pub r#ref: String,
    /// Where the package is fetched from.
    #[serde(default)]
    pub url: String,
}

/// A ref split into its two forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSpec<'a> {
    /// A branch or tag name, passed to the create step directly.
    Named(&'a str),
    /// An exact commit; the create step uses the default branch.
    Commit(&'a str),
}

impl<'a> RefSpec<'a> {
    /// Parses a ref string, recognising the reserved commit prefix.
    pub fn parse(r#ref: &'a str) -> Self {
        match r#ref.strip_prefix(COMMIT_PREFIX) {
            Some(commit) => RefSpec::Commit(commit),
            None => RefSpec::Named(r#ref),
        }
    }

    /// The bare value to hand to the version-control tool.
    pub fn target(&self) -> &'a str {
        match self {
            RefSpec::Named(name) => name,
            RefSpec::Commit(commit) => commit,
        }
    }
}

impl Dependency {
    pub fn new(package: impl Into<String>, r#ref: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            r#ref: r#ref.into(),
            url: url.into(),
        }
    }

    /// True when `other` names the same package at the same ref.
    pub fn satisfies(&self, other: &Dependency) -> bool {
        self.package == other.package && self.r#ref == other.r#ref
    }

    pub fn ref_spec(&self) -> RefSpec<'_> {
        RefSpec::parse(&self.r#ref)
    }

    /// Checks that the package identifier names a path strictly below the
    /// checkout directory.
    ///
    /// The identifier must be non-empty and relative, and must not contain
    /// `..` or consist only of `.` segments.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidPackage {
            package: self.package.clone(),
            reason: reason.to_string(),
        };

        if self.package.trim().is_empty() {
            return Err(invalid("package identifier is empty"));
        }

        let mut has_segment = false;
        for component in Path::new(&self.package).components() {
            match component {
                Component::Normal(_) => has_segment = true,
                Component::CurDir => {}
                Component::ParentDir => return Err(invalid("must not contain '..'")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("must be a relative path"))
                }
            }
        }
        if !has_segment {
            return Err(invalid("must name a directory below src/"));
        }
        Ok(())
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.package, self.r#ref)
    }
}
