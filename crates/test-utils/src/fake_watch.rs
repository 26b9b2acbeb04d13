use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use specwatch::engine::SchedulerEvent;
use specwatch::errors::Result;
use specwatch::watch::{ChangeKind, FileChange, FileWatchService, WatchHandle, WatchTarget};

/// A fake file watch service that records each registration and lets tests
/// fire events into it by registration index, like a mocked `watch().on()`.
#[derive(Clone, Default)]
pub struct FakeWatchService {
    registrations: Arc<Mutex<Vec<(WatchTarget, mpsc::UnboundedSender<SchedulerEvent>)>>>,
}

impl FakeWatchService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }

    pub fn targets(&self) -> Vec<WatchTarget> {
        self.registrations
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Report `kind` on `path` through registration number `index`.
    pub fn emit(&self, index: usize, kind: ChangeKind, path: &str) {
        let regs = self.registrations.lock().unwrap();
        let (target, tx) = &regs[index];
        tx.send(SchedulerEvent::FileChanged(FileChange {
            target: target.kind(),
            kind,
            path: PathBuf::from(path),
        }))
        .expect("scheduler event channel closed");
    }
}

impl FileWatchService for FakeWatchService {
    fn watch(
        &mut self,
        target: WatchTarget,
        events: mpsc::UnboundedSender<SchedulerEvent>,
    ) -> Result<WatchHandle> {
        let kind = target.kind();
        self.registrations.lock().unwrap().push((target, events));
        Ok(WatchHandle::detached(kind))
    }
}

/// Config provider with a fixed `files_to_watch` list.
#[derive(Debug, Clone, Default)]
pub struct StaticFiles(pub Vec<String>);

impl StaticFiles {
    pub fn new(files: &[&str]) -> Self {
        Self(files.iter().map(|f| f.to_string()).collect())
    }
}

impl specwatch::config::ConfigProvider for StaticFiles {
    fn files_to_watch(&self) -> Vec<String> {
        self.0.clone()
    }
}
