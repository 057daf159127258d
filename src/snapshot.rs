//! # Snapshots
//!
//! A `Snapshot` is one dependency-declaration document bound to a file. It
//! has a name, a revision counter that grows on every successful merge, and
//! an ordered list of `Dependency` records.
//!
//! ## File Format
//!
//! ```yaml
//! name: app
//! version: 3
//! dependencies:
//!   - package: libA
//!     version: v1
//!     url: https://example.com/libA
//! ```
//!
//! The top-level `version` is the snapshot revision; the `version` of each
//! dependency is its ref. Unknown keys are ignored on read, and files are
//! always written back in this canonical shape.
//!
//! ## Index
//!
//! Every snapshot owns a lookup index from package to position in the
//! dependency list. The index is private and is rebuilt whenever the list is
//! loaded, so the two can never disagree. A malformed document that declares
//! the same package twice keeps the first position with the last value.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::error::{Error, Result};

/// On-disk shape of a snapshot, read permissively.
#[derive(Debug, Default, Deserialize)]
struct Document {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    dependencies: Option<Vec<Dependency>>,
}

/// On-disk shape of a snapshot, written canonically.
#[derive(Debug, Serialize)]
struct DocumentRef<'a> {
    name: &'a str,
    version: u64,
    dependencies: &'a [Dependency],
}

/// A dependency-declaration document bound to a file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    name: String,
    revision: u64,
    dependencies: Vec<Dependency>,
    index: HashMap<String, usize>,
    file: PathBuf,
}

impl Snapshot {
    /// Creates an empty, unsaved snapshot bound to `file`.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            name: String::new(),
            revision: 0,
            dependencies: Vec::new(),
            index: HashMap::new(),
            file: file.into(),
        }
    }

    /// Reads and parses the snapshot stored at `path`.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the file does not exist.
    /// - `Error::Permission` if it cannot be read.
    /// - `Error::Format` if it is not valid UTF-8 or not a snapshot document.
    /// - `Error::Read` for any other I/O failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => Error::Permission {
                path: path.to_path_buf(),
            },
            ErrorKind::InvalidData => Error::Format {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            _ => Error::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::parse(&content, path)
    }

    /// Parses snapshot `content` as if it had been read from `path`.
    pub fn parse(content: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document: Document = if content.trim().is_empty() {
            Document::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| Error::Format {
                path: path.clone(),
                message: e.to_string(),
            })?
        };

        let dependencies = document.dependencies.unwrap_or_default();
        for dep in &dependencies {
            dep.validate().map_err(|e| Error::Format {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }

        let mut snapshot = Snapshot::new(path);
        snapshot.name = document.name.unwrap_or_default();
        snapshot.revision = document.version.unwrap_or_default();
        snapshot.dependencies = dependencies;
        snapshot.rebuild_index();
        Ok(snapshot)
    }

    /// Writes the snapshot back to the file it is bound to.
    pub fn save(&mut self) -> Result<()> {
        let file = self.file.clone();
        self.save_to(file)
    }

    /// Writes the snapshot to `path` and binds it to that path.
    ///
    /// The whole document is written to a temporary sibling file and renamed
    /// over `path`. On failure the in-memory state is left untouched.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_yaml()?;
        let write_error = |source: std::io::Error| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(write_error)?;
        temp.write_all(content.as_bytes()).map_err(write_error)?;
        temp.persist(path).map_err(|e| write_error(e.error))?;

        self.file = path.to_path_buf();
        Ok(())
    }

    /// Serializes the snapshot into its canonical YAML form.
    pub fn to_yaml(&self) -> Result<String> {
        let document = DocumentRef {
            name: &self.name,
            version: self.revision,
            dependencies: &self.dependencies,
        };
        Ok(serde_yaml::to_string(&document)?)
    }

    /// True when this snapshot declares `dep.package` at exactly `dep.ref`.
    pub fn contains(&self, dep: &Dependency) -> bool {
        self.get(&dep.package)
            .is_some_and(|existing| existing.r#ref == dep.r#ref)
    }

    /// Looks up the record declared for `package`.
    pub fn get(&self, package: &str) -> Option<&Dependency> {
        self.index.get(package).map(|&i| &self.dependencies[i])
    }

    /// Returns the records of `request` that this snapshot does not contain,
    /// in request order.
    pub fn missing(&self, request: &Snapshot) -> Vec<Dependency> {
        request
            .dependencies
            .iter()
            .filter(|dep| !self.contains(dep))
            .cloned()
            .collect()
    }

    /// Merges `deps` into this snapshot.
    ///
    /// Records already present at the same ref are skipped. If any record
    /// names a package that is present (or earlier in `deps`) at a different
    /// ref, the call fails with `Error::Conflict` and nothing is changed.
    ///
    /// On success the name is filled in when still empty, the revision grows
    /// by exactly one, and the number of newly added records is returned.
    ///
    /// Fails without changes on an invalid package identifier or when the
    /// revision is already at `u64::MAX`.
    pub fn update(&mut self, name: &str, deps: &[Dependency]) -> Result<usize> {
        let revision = self
            .revision
            .checked_add(1)
            .ok_or_else(|| Error::RevisionOverflow {
                path: self.file.clone(),
            })?;

        let mut pending: Vec<&Dependency> = Vec::new();
        let mut batch: HashMap<&str, &str> = HashMap::new();

        for dep in deps {
            dep.validate()?;
            let existing = self
                .get(&dep.package)
                .map(|existing| existing.r#ref.as_str())
                .or_else(|| batch.get(dep.package.as_str()).copied());

            match existing {
                Some(existing) if existing == dep.r#ref => continue,
                Some(existing) => {
                    return Err(Error::Conflict {
                        package: dep.package.clone(),
                        existing: existing.to_string(),
                        new: dep.r#ref.clone(),
                    })
                }
                None => {
                    batch.insert(&dep.package, &dep.r#ref);
                    pending.push(dep);
                }
            }
        }

        let added = pending.len();
        for dep in pending {
            self.index
                .insert(dep.package.clone(), self.dependencies.len());
            self.dependencies.push(dep.clone());
        }
        if self.name.is_empty() && !name.is_empty() {
            self.name = name.to_string();
        }
        self.revision = revision;
        Ok(added)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The revision counter, stored as the document's `version`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The file this snapshot is bound to.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The search-path root holding the snapshot file.
    pub fn root(&self) -> &Path {
        match self.file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    fn rebuild_index(&mut self) {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut deduped: Vec<Dependency> = Vec::with_capacity(self.dependencies.len());

        for dep in self.dependencies.drain(..) {
            match index.get(&dep.package) {
                Some(&i) => {
                    warn!(
                        "{}: package '{}' declared more than once, keeping {}",
                        self.file.display(),
                        dep.package,
                        dep.r#ref
                    );
                    deduped[i] = dep;
                }
                None => {
                    index.insert(dep.package.clone(), deduped.len());
                    deduped.push(dep);
                }
            }
        }

        self.dependencies = deduped;
        self.index = index;
    }
}
