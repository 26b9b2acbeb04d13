// src/watch/service.rs

//! Boundary between the scheduler and whatever produces file events.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::engine::SchedulerEvent;
use crate::errors::Result;
use crate::watch::target::{TargetKind, WatchTarget};

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Changed,
}

/// A single file event, tagged with the target whose patterns matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub target: TargetKind,
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// Keeps one registration alive. Dropping it stops that registration.
pub struct WatchHandle {
    kind: TargetKind,
    _guard: Option<Box<dyn Any + Send>>,
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl WatchHandle {
    pub fn new(kind: TargetKind, guard: impl Any + Send) -> Self {
        Self {
            kind,
            _guard: Some(Box::new(guard)),
        }
    }

    /// A handle with nothing to keep alive (e.g. a fake service).
    pub fn detached(kind: TargetKind) -> Self {
        Self { kind, _guard: None }
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Trait abstracting the file watch capability.
///
/// Every call to [`FileWatchService::watch`] is an independent registration.
/// Implementations report both added and changed files for the target as
/// [`SchedulerEvent::FileChanged`] on `events`, in the order they observe
/// them. Debouncing, if any, is the implementation's business.
pub trait FileWatchService {
    fn watch(
        &mut self,
        target: WatchTarget,
        events: mpsc::UnboundedSender<SchedulerEvent>,
    ) -> Result<WatchHandle>;
}
