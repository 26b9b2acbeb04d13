// src/pool/worker.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{RunInstruction, SchedulerEvent};
use crate::errors::Result;
use crate::types::{Capabilities, Cid, SessionId, Spec};

/// Busy/idle transition reported by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Busy,
    Idle,
}

/// A status change of one worker, as delivered to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatus {
    pub cid: Cid,
    pub state: WorkerState,
}

/// Listener the scheduler attaches to a worker at watch time.
///
/// The worker calls [`StatusListener::busy`] when a run starts and
/// [`StatusListener::idle`] when it ends. Both forward into the scheduler's
/// event channel, so all aggregate bookkeeping happens on one task.
#[derive(Debug, Clone)]
pub struct StatusListener {
    cid: Cid,
    tx: mpsc::UnboundedSender<SchedulerEvent>,
}

impl StatusListener {
    pub fn new(cid: impl Into<Cid>, tx: mpsc::UnboundedSender<SchedulerEvent>) -> Self {
        Self {
            cid: cid.into(),
            tx,
        }
    }

    pub fn cid(&self) -> &str {
        &self.cid
    }

    pub fn busy(&self) {
        self.send(WorkerState::Busy);
    }

    pub fn idle(&self) {
        self.send(WorkerState::Idle);
    }

    fn send(&self, state: WorkerState) {
        let status = WorkerStatus {
            cid: self.cid.clone(),
            state,
        };
        if self.tx.send(SchedulerEvent::Worker(status)).is_err() {
            // Scheduler already gone; nothing left to notify.
            debug!(cid = %self.cid, ?state, "status listener outlived scheduler");
        }
    }
}

/// One-way command channel into a worker process.
///
/// Production code uses [`crate::exec::ProcessWorker`]; tests provide a
/// recording implementation.
pub trait WorkerChannel: Send + Sync {
    /// Send a run instruction. Must not block on the run itself.
    fn post(&self, instruction: RunInstruction) -> Result<()>;

    /// Register a listener for busy/idle transitions of this worker.
    fn subscribe(&self, listener: StatusListener);
}

/// A session-bound worker entry in the pool.
#[derive(Clone)]
pub struct Worker {
    pub cid: Cid,
    pub specs: Vec<Spec>,
    pub session_id: Option<SessionId>,
    pub is_busy: bool,
    pub capabilities: Capabilities,
    channel: Arc<dyn WorkerChannel>,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("cid", &self.cid)
            .field("specs", &self.specs)
            .field("session_id", &self.session_id)
            .field("is_busy", &self.is_busy)
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(
        cid: impl Into<Cid>,
        specs: Vec<Spec>,
        capabilities: Capabilities,
        channel: Arc<dyn WorkerChannel>,
    ) -> Self {
        Self {
            cid: cid.into(),
            specs,
            session_id: None,
            is_busy: false,
            capabilities,
            channel,
        }
    }

    pub fn channel(&self) -> &Arc<dyn WorkerChannel> {
        &self.channel
    }

    /// True if `path` is one of this worker's spec files (single or grouped).
    pub fn runs_spec(&self, path: &Path) -> bool {
        self.specs.iter().any(|s| s.contains(path))
    }

    /// The instruction that re-runs this worker on its current session.
    ///
    /// Without an established session there is nothing to reuse, so the
    /// worker gets a plain run instead.
    pub fn rerun_instruction(&self, spec: Option<&Path>) -> RunInstruction {
        match (&self.session_id, spec) {
            (Some(session_id), spec) => RunInstruction::ReuseSession {
                session_id: session_id.clone(),
                spec: spec.map(Path::to_path_buf),
            },
            (None, Some(path)) => RunInstruction::RunSpec(path.to_path_buf()),
            (None, None) => RunInstruction::RunAll,
        }
    }
}
