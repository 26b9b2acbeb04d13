// src/engine/mod.rs

//! Scheduling engine for specwatch.
//!
//! This module ties together:
//! - the pure dispatch planning that turns a [`RunInstruction`] into
//!   per-worker instructions and job-start notices ([`core`])
//! - idle/finalise bookkeeping over the whole pool ([`idle`])
//! - the [`Scheduler`] that owns both and talks to workers, the reporter and
//!   the file watch service
//! - the [`Runtime`] event loop that feeds the scheduler:
//!   - file-watch changes
//!   - worker busy/idle transitions
//!   - explicit run requests
//!   - shutdown signals

use std::path::PathBuf;

use crate::pool::WorkerStatus;
use crate::types::SessionId;
use crate::watch::FileChange;

/// A run instruction, both as accepted by [`Scheduler::run`] and as posted
/// to a single worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInstruction {
    /// Re-run every worker on its full assignment.
    RunAll,
    /// Re-run the workers whose assignment contains this file.
    RunSpec(PathBuf),
    /// Re-run on an existing session instead of opening a new one. With a
    /// `spec`, only that file is passed on; without, the worker re-runs its
    /// whole assignment.
    ReuseSession {
        session_id: SessionId,
        spec: Option<PathBuf>,
    },
}

/// Events flowing into the runtime from watchers, workers, etc.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// A watched file was added or changed.
    FileChanged(FileChange),
    /// A worker started or finished a run.
    Worker(WorkerStatus),
    /// Run request from outside the watcher (e.g. the initial run).
    RunRequested(RunInstruction),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod idle;
pub mod runtime;
pub mod scheduler;

pub use self::core::{plan_dispatch, Dispatch};
pub use idle::IdleTracker;
pub use runtime::Runtime;
pub use scheduler::Scheduler;
