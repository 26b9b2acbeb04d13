use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use specwatch::engine::RunInstruction;
use specwatch::errors::{Result, SpecwatchError};
use specwatch::pool::{StatusListener, WorkerChannel};

/// A fake worker channel that:
/// - records every posted instruction
/// - keeps subscribed listeners so tests can fire busy/idle transitions
/// - can be closed to simulate a dead worker
pub struct RecordingChannel {
    cid: String,
    posted: Mutex<Vec<RunInstruction>>,
    listeners: Mutex<Vec<StatusListener>>,
    closed: AtomicBool,
}

impl RecordingChannel {
    pub fn new(cid: &str) -> Arc<Self> {
        Arc::new(Self {
            cid: cid.to_string(),
            posted: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub fn posted(&self) -> Vec<RunInstruction> {
        self.posted.lock().unwrap().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Simulate the worker starting a run.
    pub fn report_busy(&self) {
        for l in self.listeners.lock().unwrap().iter() {
            l.busy();
        }
    }

    /// Simulate the worker finishing a run.
    pub fn report_idle(&self) {
        for l in self.listeners.lock().unwrap().iter() {
            l.idle();
        }
    }

    /// Make every further `post` fail.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl WorkerChannel for RecordingChannel {
    fn post(&self, instruction: RunInstruction) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SpecwatchError::WorkerUnavailable(self.cid.clone()));
        }
        self.posted.lock().unwrap().push(instruction);
        Ok(())
    }

    fn subscribe(&self, listener: StatusListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}
