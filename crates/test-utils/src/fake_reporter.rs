use std::sync::{Arc, Mutex};

use specwatch::reporter::{JobStart, ProgressReporter};

/// One call received by the [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterCall {
    BeginBatch(usize),
    JobStarted(JobStart),
    Finalise,
}

/// Reporter that records every call. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    calls: Arc<Mutex<Vec<ReporterCall>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ReporterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn jobs(&self) -> Vec<JobStart> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ReporterCall::JobStarted(job) => Some(job),
                _ => None,
            })
            .collect()
    }

    pub fn job_cids(&self) -> Vec<String> {
        self.jobs().into_iter().map(|j| j.cid).collect()
    }

    pub fn finalise_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ReporterCall::Finalise))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ProgressReporter for RecordingReporter {
    fn begin_batch(&mut self, total_workers: usize) {
        self.calls
            .lock()
            .unwrap()
            .push(ReporterCall::BeginBatch(total_workers));
    }

    fn job_started(&mut self, job: &JobStart) {
        self.calls
            .lock()
            .unwrap()
            .push(ReporterCall::JobStarted(job.clone()));
    }

    fn finalise(&mut self) {
        self.calls.lock().unwrap().push(ReporterCall::Finalise);
    }
}
