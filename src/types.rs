// src/types.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Composite worker key, e.g. `"0-1"` (capability index, spec index).
pub type Cid = String;

/// Identifier of a live session held by a worker.
pub type SessionId = String;

/// Opaque capability descriptor, only used for reporting.
pub type Capabilities = BTreeMap<String, String>;

/// A spec entry: one file, or a group of files that must run together, in
/// order, within one session.
///
/// In TOML both shapes are accepted:
///
/// ```toml
/// specs = ["tests/a.js", ["tests/b.js", "tests/c.js"]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Spec {
    File(PathBuf),
    Group(Vec<PathBuf>),
}

impl Spec {
    /// True if `path` is this file, or any member of this group.
    pub fn contains(&self, path: &Path) -> bool {
        match self {
            Spec::File(file) => file == path,
            Spec::Group(files) => files.iter().any(|f| f == path),
        }
    }

    /// All files of this spec, in order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        let files: &[PathBuf] = match self {
            Spec::File(file) => std::slice::from_ref(file),
            Spec::Group(files) => files,
        };
        files.iter().map(PathBuf::as_path)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Spec::Group(_))
    }

    /// The same spec with relative paths resolved against `root`.
    ///
    /// File events carry absolute paths, so specs must be anchored before
    /// they are compared with them.
    pub fn anchored(&self, root: &Path) -> Spec {
        match self {
            Spec::File(file) => Spec::File(anchor_path(root, file)),
            Spec::Group(files) => Spec::Group(files.iter().map(|f| anchor_path(root, f)).collect()),
        }
    }
}

fn anchor_path(root: &Path, path: &Path) -> PathBuf {
    root.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::File(file) => write!(f, "{}", file.display()),
            Spec::Group(files) => {
                let joined: Vec<String> =
                    files.iter().map(|p| p.display().to_string()).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

/// The specs a session was originally invoked with (`--spec`).
///
/// Only spec-target events are gated by it; changes to `files_to_watch`
/// always re-run every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRestriction {
    specs: Vec<Spec>,
}

impl SpecRestriction {
    pub fn new(specs: Vec<Spec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[Spec] {
        &self.specs
    }

    /// The same restriction with every spec anchored at `root`.
    pub fn anchored(&self, root: &Path) -> Self {
        Self::new(self.specs.iter().map(|s| s.anchored(root)).collect())
    }

    /// True if `path` belongs to one of the restricted specs.
    pub fn admits(&self, path: &Path) -> bool {
        self.specs.iter().any(|s| s.contains(path))
    }

    /// True if every file of every spec in `assignment` is admitted.
    pub fn covers(&self, assignment: &[Spec]) -> bool {
        assignment
            .iter()
            .flat_map(Spec::files)
            .all(|file| self.admits(file))
    }
}
