// src/exec/process_worker.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::RunInstruction;
use crate::errors::{Result, SpecwatchError};
use crate::exec::task_runner::{files_for_change, run_specs, WorkerCommand};
use crate::pool::{StatusListener, WorkerChannel, WorkerPool, WorkerState};
use crate::types::{Cid, SessionId, Spec};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Worker channel backed by a local child process per run.
///
/// Instructions are queued and executed one after another by the worker's
/// own task, so overlapping instructions never run concurrently on the same
/// session.
#[derive(Debug)]
pub struct ProcessWorker {
    cid: Cid,
    tx: mpsc::UnboundedSender<RunInstruction>,
    listeners: Arc<Mutex<Vec<StatusListener>>>,
}

impl WorkerChannel for ProcessWorker {
    fn post(&self, instruction: RunInstruction) -> Result<()> {
        self.tx
            .send(instruction)
            .map_err(|_| SpecwatchError::WorkerUnavailable(self.cid.clone()))
    }

    fn subscribe(&self, listener: StatusListener) {
        match self.listeners.lock() {
            Ok(mut guard) => guard.push(listener),
            Err(_) => warn!(cid = %self.cid, "listener list poisoned; subscription dropped"),
        }
    }
}

/// Spawn the background loop for worker `cid` and return its channel.
///
/// The loop reads the worker's entry from `pool` for every instruction,
/// flips its `is_busy` flag around the run, records the session id after
/// the first run, and notifies subscribed listeners. It stops when the
/// worker is removed from the pool or the channel is dropped.
pub fn spawn_process_worker(
    cid: impl Into<Cid>,
    command: WorkerCommand,
    pool: WorkerPool,
) -> Arc<ProcessWorker> {
    let cid = cid.into();
    let (tx, mut rx) = mpsc::unbounded_channel::<RunInstruction>();
    let listeners: Arc<Mutex<Vec<StatusListener>>> = Arc::new(Mutex::new(Vec::new()));

    let loop_cid = cid.clone();
    let loop_listeners = Arc::clone(&listeners);
    tokio::spawn(async move {
        debug!(cid = %loop_cid, "worker loop started");

        while let Some(instruction) = rx.recv().await {
            let Some(worker) = pool.get(&loop_cid) else {
                info!(cid = %loop_cid, "worker left the pool; stopping");
                break;
            };

            let files = files_for_instruction(&worker.specs, &instruction);
            let session_id = session_for_instruction(&instruction, worker.session_id, &loop_cid);

            pool.update(&loop_cid, |w| w.is_busy = true);
            notify(&loop_listeners, &loop_cid, WorkerState::Busy);

            match run_specs(&command, &loop_cid, &session_id, &files).await {
                Ok(status) if status.success() => {
                    info!(cid = %loop_cid, "run passed");
                }
                Ok(status) => {
                    warn!(cid = %loop_cid, exit_code = ?status.code(), "run failed");
                }
                Err(err) => {
                    error!(cid = %loop_cid, error = %err, "worker process error");
                }
            }

            pool.update(&loop_cid, |w| {
                w.is_busy = false;
                w.session_id = Some(session_id);
            });
            notify(&loop_listeners, &loop_cid, WorkerState::Idle);
        }

        debug!(cid = %loop_cid, "worker loop finished");
    });

    Arc::new(ProcessWorker { cid, tx, listeners })
}

fn notify(listeners: &Mutex<Vec<StatusListener>>, cid: &str, state: WorkerState) {
    let listeners = match listeners.lock() {
        Ok(guard) => guard.clone(),
        Err(_) => {
            warn!(cid, "listener list poisoned; status not reported");
            return;
        }
    };

    for listener in &listeners {
        match state {
            WorkerState::Busy => listener.busy(),
            WorkerState::Idle => listener.idle(),
        }
    }
}

/// Spec files a single instruction runs.
pub fn files_for_instruction(specs: &[Spec], instruction: &RunInstruction) -> Vec<PathBuf> {
    match instruction {
        RunInstruction::RunSpec(path)
        | RunInstruction::ReuseSession {
            spec: Some(path), ..
        } => files_for_change(specs, path),
        RunInstruction::RunAll | RunInstruction::ReuseSession { spec: None, .. } => specs
            .iter()
            .flat_map(Spec::files)
            .map(Path::to_path_buf)
            .collect(),
    }
}

fn session_for_instruction(
    instruction: &RunInstruction,
    current: Option<SessionId>,
    cid: &str,
) -> SessionId {
    match instruction {
        RunInstruction::ReuseSession { session_id, .. } => session_id.clone(),
        RunInstruction::RunAll | RunInstruction::RunSpec(_) => current.unwrap_or_else(|| {
            let n = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("{cid}-s{n}")
        }),
    }
}
