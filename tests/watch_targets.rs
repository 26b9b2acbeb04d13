// tests/watch_targets.rs

use specwatch::watch::{TargetKind, WatchTarget};
use specwatch_test_utils::builders::WorkerBuilder;
use specwatch_test_utils::fake_watch::{FakeWatchService, StaticFiles};
use specwatch_test_utils::{init_tracing, Harness};

#[test]
fn registers_only_spec_target_without_files_to_watch() {
    init_tracing();

    let mut h = Harness::new(vec![
        WorkerBuilder::new("0-0").spec("/a.js").build(),
        WorkerBuilder::new("0-1").spec("/b.js").build(),
    ]);
    let mut service = FakeWatchService::new();

    h.scheduler
        .watch(&StaticFiles::default(), &mut service)
        .expect("watch should succeed");

    assert_eq!(service.registration_count(), 1);
    assert_eq!(
        service.targets(),
        vec![WatchTarget::new(
            TargetKind::Specs,
            vec!["/a.js".to_string(), "/b.js".to_string()]
        )]
    );
    assert_eq!(h.scheduler.watch_handles().len(), 1);
}

#[test]
fn registers_auxiliary_target_separately() {
    init_tracing();

    let mut h = Harness::new(vec![WorkerBuilder::new("0-0").spec("/a.js").build()]);
    let mut service = FakeWatchService::new();

    h.scheduler
        .watch(&StaticFiles::new(&["/w.js", "/lib/**/*.js"]), &mut service)
        .unwrap();

    let targets = service.targets();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].kind(), TargetKind::Specs);
    assert_eq!(targets[1].kind(), TargetKind::Auxiliary);
    assert_eq!(
        targets[1].patterns().to_vec(),
        vec!["/w.js".to_string(), "/lib/**/*.js".to_string()]
    );
}

#[test]
fn spec_target_flattens_groups_and_dedupes() {
    init_tracing();

    let mut h = Harness::new(vec![
        WorkerBuilder::new("0-0")
            .group(&["/a.js", "/b.js", "/c.js"])
            .build(),
        WorkerBuilder::new("0-1").spec("/b.js").build(),
        WorkerBuilder::new("1-0").spec("/d.js").build(),
    ]);
    let mut service = FakeWatchService::new();

    h.scheduler
        .watch(&StaticFiles::default(), &mut service)
        .unwrap();

    let expected: Vec<String> = ["/a.js", "/b.js", "/c.js", "/d.js"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(service.targets()[0].patterns().to_vec(), expected);
}

#[test]
fn empty_pool_still_registers_spec_target() {
    init_tracing();

    let mut h = Harness::new(Vec::new());
    let mut service = FakeWatchService::new();

    h.scheduler
        .watch(&StaticFiles::default(), &mut service)
        .unwrap();

    assert_eq!(service.registration_count(), 1);
    assert!(service.targets()[0].patterns().is_empty());
}

#[test]
fn attaches_one_listener_per_worker() {
    init_tracing();

    let mut h = Harness::new(vec![
        WorkerBuilder::new("0-0").spec("/a.js").build(),
        WorkerBuilder::new("0-1").spec("/b.js").build(),
    ]);
    let mut service = FakeWatchService::new();

    h.scheduler
        .watch(&StaticFiles::default(), &mut service)
        .unwrap();

    assert_eq!(h.channel("0-0").listener_count(), 1);
    assert_eq!(h.channel("0-1").listener_count(), 1);
}
