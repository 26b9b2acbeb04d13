// tests/notify_watch.rs

use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;

use specwatch::engine::SchedulerEvent;
use specwatch::watch::{FileWatchService, NotifyWatchService, TargetKind, WatchTarget};
use specwatch_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn reports_matching_files_with_absolute_paths() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();

    let mut service = NotifyWatchService::new(dir.path());
    let root = service.root().clone();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = service
        .watch(
            WatchTarget::new(TargetKind::Auxiliary, vec!["lib/**/*.js".to_string()]),
            tx,
        )
        .unwrap();
    assert_eq!(handle.kind(), TargetKind::Auxiliary);

    // Give the backend a moment to arm before touching files.
    tokio::time::sleep(Duration::from_millis(100)).await;
    fs::write(root.join("lib/ignored.txt"), "x").unwrap();
    fs::write(root.join("lib/util.js"), "module.exports = 1;").unwrap();

    let change = loop {
        match with_timeout(rx.recv()).await {
            Some(SchedulerEvent::FileChanged(change)) => break change,
            Some(other) => panic!("unexpected event: {:?}", other),
            None => panic!("watch channel closed"),
        }
    };

    assert_eq!(change.target, TargetKind::Auxiliary);
    assert_eq!(change.path, root.join("lib/util.js"));
    drop(handle);
}
