// src/watch/target.rs

//! Typed watch targets.
//!
//! There are exactly two kinds of target and each carries its own re-run
//! policy, so the policy is decided by the target an event came from and
//! never by registration order.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::engine::RunInstruction;
use crate::pool::WorkerMap;

/// Which of the two independently watched pattern sets a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Spec files assigned to workers. A change re-runs the workers that
    /// own the changed file.
    Specs,
    /// `files_to_watch`. A change re-runs every worker.
    Auxiliary,
}

impl TargetKind {
    /// Map a changed path to the run instruction this target's policy
    /// prescribes.
    pub fn resolve(self, path: &Path) -> RunInstruction {
        match self {
            TargetKind::Specs => RunInstruction::RunSpec(path.to_path_buf()),
            TargetKind::Auxiliary => RunInstruction::RunAll,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Specs => f.write_str("specs"),
            TargetKind::Auxiliary => f.write_str("files_to_watch"),
        }
    }
}

/// A set of glob patterns registered with the file watch service as one
/// unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    kind: TargetKind,
    patterns: Vec<String>,
}

impl WatchTarget {
    pub fn new(kind: TargetKind, patterns: Vec<String>) -> Self {
        Self { kind, patterns }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Build the watch targets for the given pool and auxiliary file list.
///
/// - The spec target is always present: every spec file of every worker,
///   flattened out of groups, deduplicated in first-seen order.
/// - The auxiliary target is only present when `files_to_watch` is
///   non-empty.
pub fn build_watch_targets(workers: &WorkerMap, files_to_watch: &[String]) -> Vec<WatchTarget> {
    let mut seen = HashSet::new();
    let spec_patterns: Vec<String> = workers
        .values()
        .flat_map(|w| w.specs.iter())
        .flat_map(|spec| spec.files())
        .map(|file| file.to_string_lossy().into_owned())
        .filter(|pattern| seen.insert(pattern.clone()))
        .collect();

    let mut targets = vec![WatchTarget::new(TargetKind::Specs, spec_patterns)];

    if !files_to_watch.is_empty() {
        targets.push(WatchTarget::new(
            TargetKind::Auxiliary,
            files_to_watch.to_vec(),
        ));
    }

    targets
}
