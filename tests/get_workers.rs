// tests/get_workers.rs

use std::path::Path;

use specwatch::pool::Worker;
use specwatch_test_utils::builders::WorkerBuilder;
use specwatch_test_utils::Harness;

fn sample() -> Harness {
    Harness::new(vec![
        WorkerBuilder::new("0-0").spec("/a.js").build(),
        WorkerBuilder::new("0-1").spec("/b.js").busy(true).build(),
        WorkerBuilder::new("1-0").spec("/a.js").build(),
    ])
}

fn keys(map: &specwatch::pool::WorkerMap) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

#[test]
fn include_busy_returns_whole_pool() {
    let h = sample();
    let all = h.scheduler.get_workers(None, true);
    assert_eq!(keys(&all), vec!["0-0", "0-1", "1-0"]);
}

#[test]
fn default_excludes_busy_workers() {
    let h = sample();
    let idle = h.scheduler.get_workers(None, false);
    assert_eq!(keys(&idle), vec!["0-0", "1-0"]);
}

#[test]
fn predicate_intersects_with_idle_workers() {
    let h = sample();
    let runs_b = |w: &Worker| w.runs_spec(Path::new("/b.js"));
    let runs_a = |w: &Worker| w.runs_spec(Path::new("/a.js"));

    assert!(h.scheduler.get_workers(Some(&runs_b), false).is_empty());
    assert_eq!(keys(&h.scheduler.get_workers(Some(&runs_b), true)), vec!["0-1"]);
    assert_eq!(
        keys(&h.scheduler.get_workers(Some(&runs_a), false)),
        vec!["0-0", "1-0"]
    );
}

#[test]
fn result_is_a_copy_of_the_pool() {
    let h = sample();
    let mut copy = h.scheduler.get_workers(None, true);
    copy.clear();

    assert_eq!(h.pool.len(), 3);
    assert!(!h.pool.is_empty());
}

#[test]
fn empty_pool_yields_empty_result() {
    let h = Harness::new(Vec::new());
    assert!(h.scheduler.get_workers(None, true).is_empty());
    assert!(h.scheduler.get_workers(None, false).is_empty());
}
