// src/engine/scheduler.rs

use std::collections::BTreeSet;
use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ConfigProvider;
use crate::engine::core::plan_dispatch;
use crate::engine::idle::IdleTracker;
use crate::engine::{RunInstruction, SchedulerEvent};
use crate::errors::Result;
use crate::pool::{StatusListener, Worker, WorkerMap, WorkerPool, WorkerState, WorkerStatus};
use crate::reporter::ProgressReporter;
use crate::types::{Cid, SpecRestriction};
use crate::watch::{build_watch_targets, FileChange, FileWatchService, TargetKind, WatchHandle};

/// The watcher/scheduler.
///
/// It owns:
/// - a handle to the live worker pool (read on every call, never cached)
/// - the progress reporter
/// - the optional `--spec` restriction
/// - the idle tracker deciding when to finalise
/// - the watch registrations, kept alive for as long as the scheduler lives
/// - the cids it attached a status listener to
///
/// All methods are synchronous and non-blocking; sends to workers are
/// fire-and-forget and completions come back as [`SchedulerEvent`]s.
pub struct Scheduler<R: ProgressReporter> {
    pool: WorkerPool,
    reporter: R,
    restriction: Option<SpecRestriction>,
    idle: IdleTracker,
    events_tx: mpsc::UnboundedSender<SchedulerEvent>,
    handles: Vec<WatchHandle>,
    subscribed: BTreeSet<Cid>,
}

impl<R: ProgressReporter> fmt::Debug for Scheduler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pool", &self.pool)
            .field("restriction", &self.restriction)
            .field("idle", &self.idle)
            .field("handles", &self.handles)
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

impl<R: ProgressReporter> Scheduler<R> {
    /// `events_tx` is the sender side of the channel the [`Runtime`] reads;
    /// watch registrations and worker listeners report into it.
    ///
    /// [`Runtime`]: crate::engine::Runtime
    pub fn new(
        pool: WorkerPool,
        reporter: R,
        events_tx: mpsc::UnboundedSender<SchedulerEvent>,
    ) -> Self {
        Self {
            pool,
            reporter,
            restriction: None,
            idle: IdleTracker::new(),
            events_tx,
            handles: Vec::new(),
            subscribed: BTreeSet::new(),
        }
    }

    pub fn with_restriction(mut self, restriction: Option<SpecRestriction>) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn restriction(&self) -> Option<&SpecRestriction> {
        self.restriction.as_ref()
    }

    pub fn watch_handles(&self) -> &[WatchHandle] {
        &self.handles
    }

    /// Register the watch targets and start idle tracking.
    ///
    /// - One registration for the spec files of every worker currently in
    ///   the pool.
    /// - One more for `files_to_watch`, only if it is non-empty.
    /// - One status listener per worker present right now.
    pub fn watch<C, S>(&mut self, config: &C, service: &mut S) -> Result<()>
    where
        C: ConfigProvider + ?Sized,
        S: FileWatchService + ?Sized,
    {
        let workers = self.pool.snapshot();
        let files_to_watch = config.files_to_watch();

        for target in build_watch_targets(&workers, &files_to_watch) {
            debug!(
                target_kind = %target.kind(),
                patterns = ?target.patterns(),
                "registering watch target"
            );
            let handle = service.watch(target, self.events_tx.clone())?;
            self.handles.push(handle);
        }

        for worker in workers.values() {
            let listener = StatusListener::new(worker.cid.clone(), self.events_tx.clone());
            worker.channel().subscribe(listener);
            self.subscribed.insert(worker.cid.clone());
        }

        self.idle
            .seed(workers.values().filter(|w| w.is_busy).map(|w| w.cid.clone()));

        info!(
            workers = workers.len(),
            registrations = self.handles.len(),
            "watching for changes"
        );
        Ok(())
    }

    /// Read view of the live pool; see [`WorkerPool::get_workers`].
    pub fn get_workers(
        &self,
        predicate: Option<&dyn Fn(&Worker) -> bool>,
        include_busy: bool,
    ) -> WorkerMap {
        self.pool.get_workers(predicate, include_busy)
    }

    /// Dispatch `instruction` to the matching workers.
    ///
    /// Every worker that accepts its instruction gets a job-start notice.
    /// Workers that were listened to at watch time are also counted busy;
    /// a worker added later never reports back, so it cannot hold the pool
    /// busy. Returns the number of workers started; zero is a silent
    /// outcome.
    pub fn run(&mut self, instruction: RunInstruction) -> usize {
        let plan = plan_dispatch(&self.pool, &instruction, self.restriction.as_ref());

        if plan.is_empty() {
            debug!(?instruction, "no worker matched; nothing to run");
            return 0;
        }

        let mut accepted = Vec::with_capacity(plan.len());
        for dispatch in plan {
            let cid = dispatch.worker.cid.as_str();
            debug!(cid, instruction = ?dispatch.instruction, "dispatching to worker");

            if let Err(err) = dispatch.worker.channel().post(dispatch.instruction.clone()) {
                warn!(cid, error = %err, "failed to post run instruction");
                continue;
            }
            accepted.push(dispatch);
        }

        if accepted.is_empty() {
            return 0;
        }

        self.reporter.begin_batch(accepted.len());
        for dispatch in &accepted {
            let cid = dispatch.worker.cid.as_str();
            if self.subscribed.contains(cid) {
                self.idle.mark_busy(cid);
            }
            self.reporter.job_started(&dispatch.job());
        }

        accepted.len()
    }

    /// Resolve a file change by the policy of the target it came from and
    /// run the result.
    pub fn on_file_change(&mut self, change: FileChange) -> usize {
        let instruction = change.target.resolve(&change.path);

        if change.target == TargetKind::Specs {
            if let Some(restriction) = &self.restriction {
                if !restriction.admits(&change.path) {
                    debug!(path = ?change.path, "change outside --spec restriction");
                }
            }
        }

        debug!(
            target_kind = %change.target,
            kind = ?change.kind,
            path = ?change.path,
            "file change"
        );
        self.run(instruction)
    }

    /// Apply a worker's busy/idle transition; finalise when the pool has
    /// drained.
    ///
    /// Drained means no dispatched worker is still outstanding and no worker
    /// in the live pool reports `is_busy`.
    pub fn on_worker_status(&mut self, status: WorkerStatus) {
        match status.state {
            WorkerState::Busy => self.idle.mark_busy(&status.cid),
            WorkerState::Idle => {
                let pool = &self.pool;
                self.idle.retain(|cid| pool.contains(cid));
                self.idle.release(&status.cid);

                let reports_busy = |w: &Worker| w.is_busy;
                let still_busy = self.pool.get_workers(Some(&reports_busy), true);
                if !still_busy.is_empty() {
                    debug!(
                        cid = %status.cid,
                        busy = ?still_busy.keys().collect::<Vec<_>>(),
                        "completion while pool still busy"
                    );
                    return;
                }

                if self.idle.check() {
                    info!(cid = %status.cid, "all workers idle; finalising");
                    self.reporter.finalise();
                }
            }
        }
    }

    /// Handle a single event. Returns `false` once the runtime should stop.
    pub fn handle_event(&mut self, event: SchedulerEvent) -> bool {
        match event {
            SchedulerEvent::FileChanged(change) => {
                self.on_file_change(change);
            }
            SchedulerEvent::Worker(status) => self.on_worker_status(status),
            SchedulerEvent::RunRequested(instruction) => {
                self.run(instruction);
            }
            SchedulerEvent::ShutdownRequested => return false,
        }
        true
    }
}
