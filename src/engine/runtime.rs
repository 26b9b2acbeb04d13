// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{Scheduler, SchedulerEvent};
use crate::reporter::ProgressReporter;

/// Drives the [`Scheduler`] in response to [`SchedulerEvent`]s.
///
/// This is the single coordinating task: file changes, worker transitions
/// and run requests are applied one at a time, in arrival order.
pub struct Runtime<R: ProgressReporter> {
    scheduler: Scheduler<R>,
    event_rx: mpsc::UnboundedReceiver<SchedulerEvent>,
}

impl<R: ProgressReporter> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<R: ProgressReporter> Runtime<R> {
    pub fn new(
        scheduler: Scheduler<R>,
        event_rx: mpsc::UnboundedReceiver<SchedulerEvent>,
    ) -> Self {
        Self {
            scheduler,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// Runs until `ShutdownRequested` arrives or every sender is gone, then
    /// hands the scheduler back (dropping it stops the watchers).
    pub async fn run(mut self) -> Scheduler<R> {
        info!("specwatch runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            if !self.scheduler.handle_event(event) {
                info!("shutdown requested; stopping runtime");
                return self.scheduler;
            }
        }

        info!("runtime event channel closed; exiting");
        self.scheduler
    }
}
