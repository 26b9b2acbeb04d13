// src/watch/notify_service.rs

use std::path::PathBuf;

use notify::event::EventKind;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::SchedulerEvent;
use crate::errors::Result;
use crate::watch::patterns::{nearest_existing, CompiledTarget};
use crate::watch::service::{ChangeKind, FileChange, FileWatchService, WatchHandle};
use crate::watch::target::WatchTarget;

/// File watch service backed by `notify`.
///
/// Each registration gets its own `RecommendedWatcher`, watching the
/// literal base directories of the target's patterns recursively.
#[derive(Debug, Clone)]
pub struct NotifyWatchService {
    root: PathBuf,
}

impl NotifyWatchService {
    /// `root` is the directory relative patterns are resolved against.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        // Canonicalize once so we have a stable base path.
        let root = root.canonicalize().unwrap_or(root);
        Self { root }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl FileWatchService for NotifyWatchService {
    fn watch(
        &mut self,
        target: WatchTarget,
        events: mpsc::UnboundedSender<SchedulerEvent>,
    ) -> Result<WatchHandle> {
        let compiled = CompiledTarget::compile(&self.root, &target)?;
        let kind = compiled.kind();
        let bases = compiled.bases().to_vec();

        // Closure called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => forward_event(&compiled, event, &events),
                Err(err) => {
                    warn!(target_kind = %kind, error = %err, "file watch error");
                }
            },
            Config::default(),
        )?;

        for base in &bases {
            match nearest_existing(base) {
                Some(dir) => {
                    watcher.watch(&dir, RecursiveMode::Recursive)?;
                    debug!(target_kind = %kind, dir = ?dir, "watching directory");
                }
                None => warn!(target_kind = %kind, base = ?base, "nothing to watch for pattern base"),
            }
        }

        info!(
            target_kind = %kind,
            patterns = target.patterns().len(),
            "file watcher registered"
        );

        Ok(WatchHandle::new(kind, watcher))
    }
}

fn forward_event(
    compiled: &CompiledTarget,
    event: Event,
    events: &mpsc::UnboundedSender<SchedulerEvent>,
) {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Added,
        EventKind::Modify(_) => ChangeKind::Changed,
        _ => return,
    };

    for path in event.paths {
        if !compiled.matches(&path) {
            continue;
        }
        let change = FileChange {
            target: compiled.kind(),
            kind,
            path,
        };
        if events.send(SchedulerEvent::FileChanged(change)).is_err() {
            debug!("scheduler event channel closed; dropping file event");
            return;
        }
    }
}
