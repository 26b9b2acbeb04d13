pub mod builders;
pub mod fake_reporter;
pub mod fake_watch;
pub mod fake_worker;

use std::collections::BTreeMap;
use std::sync::{Arc, Once};

use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use specwatch::engine::{Scheduler, SchedulerEvent};
use specwatch::pool::{Worker, WorkerPool};
use specwatch::types::SpecRestriction;

use crate::fake_reporter::RecordingReporter;
use crate::fake_worker::RecordingChannel;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// A scheduler over a pool of recording workers, driven synchronously.
///
/// Events produced by fake watch registrations and worker listeners land in
/// `rx`; [`Harness::pump`] feeds them to the scheduler in order.
pub struct Harness {
    pub pool: WorkerPool,
    pub reporter: RecordingReporter,
    pub scheduler: Scheduler<RecordingReporter>,
    pub tx: mpsc::UnboundedSender<SchedulerEvent>,
    pub rx: mpsc::UnboundedReceiver<SchedulerEvent>,
    pub channels: BTreeMap<String, Arc<RecordingChannel>>,
}

impl Harness {
    pub fn new(workers: Vec<(Worker, Arc<RecordingChannel>)>) -> Self {
        Self::with_restriction(workers, None)
    }

    pub fn with_restriction(
        workers: Vec<(Worker, Arc<RecordingChannel>)>,
        restriction: Option<SpecRestriction>,
    ) -> Self {
        let pool = WorkerPool::new();
        let mut channels = BTreeMap::new();
        for (worker, channel) in workers {
            channels.insert(worker.cid.clone(), channel);
            pool.insert(worker);
        }

        let reporter = RecordingReporter::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(pool.clone(), reporter.clone(), tx.clone())
            .with_restriction(restriction);

        Self {
            pool,
            reporter,
            scheduler,
            tx,
            rx,
            channels,
        }
    }

    pub fn channel(&self, cid: &str) -> &Arc<RecordingChannel> {
        &self.channels[cid]
    }

    /// Feed every queued event to the scheduler. Returns how many were
    /// handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.scheduler.handle_event(event);
            handled += 1;
        }
        handled
    }
}
