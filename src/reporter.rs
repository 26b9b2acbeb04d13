// src/reporter.rs

//! Progress reporting boundary.

use crate::types::{Capabilities, Cid, Spec};

/// Notice that a worker was (re)started, naming its full assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStart {
    pub cid: Cid,
    pub caps: Capabilities,
    pub specs: Vec<Spec>,
}

/// Receives job-start notices and the end-of-batch signal.
pub trait ProgressReporter: Send {
    /// A non-empty dispatch is about to start `total_workers` jobs. Resets
    /// any per-batch bookkeeping.
    fn begin_batch(&mut self, total_workers: usize);

    fn job_started(&mut self, job: &JobStart);

    /// The pool drained back to idle. Called once per idle transition.
    fn finalise(&mut self);
}

/// Reporter printing one line per event to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    total_workers: usize,
    started: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn begin_batch(&mut self, total_workers: usize) {
        self.total_workers = total_workers;
        self.started = 0;
    }

    fn job_started(&mut self, job: &JobStart) {
        self.started += 1;
        let specs: Vec<String> = job.specs.iter().map(ToString::to_string).collect();
        let caps: Vec<String> = job.caps.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!(
            "[specwatch] [{}/{}] {} ({}) {}",
            self.started,
            self.total_workers,
            job.cid,
            caps.join(" "),
            specs.join(" ")
        );
    }

    fn finalise(&mut self) {
        println!(
            "[specwatch] {} job(s) finished; waiting for changes",
            self.started
        );
    }
}
