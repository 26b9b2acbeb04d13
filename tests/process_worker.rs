// tests/process_worker.rs

#![cfg(unix)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use specwatch::engine::{RunInstruction, SchedulerEvent};
use specwatch::exec::process_worker::files_for_instruction;
use specwatch::exec::task_runner::files_for_change;
use specwatch::exec::{populate_pool, run_specs, spawn_process_worker, WorkerCommand};
use specwatch::pool::{
    StatusListener, Worker, WorkerChannel, WorkerPool, WorkerState, WorkerStatus,
};
use specwatch::types::Spec;
use specwatch_test_utils::builders::ConfigFileBuilder;
use specwatch_test_utils::{init_tracing, with_timeout};

fn group(paths: &[&str]) -> Spec {
    Spec::Group(paths.iter().map(PathBuf::from).collect())
}

#[test]
fn group_member_change_runs_the_whole_group() {
    let specs = vec![Spec::File("/x.js".into()), group(&["/a.js", "/b.js"])];

    assert_eq!(
        files_for_change(&specs, Path::new("/b.js")),
        vec![PathBuf::from("/a.js"), PathBuf::from("/b.js")]
    );
    assert_eq!(
        files_for_change(&specs, Path::new("/x.js")),
        vec![PathBuf::from("/x.js")]
    );
}

#[test]
fn full_runs_pass_every_assigned_file() {
    let specs = vec![Spec::File("/x.js".into()), group(&["/a.js", "/b.js"])];
    let expected: Vec<PathBuf> = ["/x.js", "/a.js", "/b.js"].iter().map(PathBuf::from).collect();

    assert_eq!(files_for_instruction(&specs, &RunInstruction::RunAll), expected);
    assert_eq!(
        files_for_instruction(
            &specs,
            &RunInstruction::ReuseSession {
                session_id: "s".into(),
                spec: None
            }
        ),
        expected
    );
    assert_eq!(
        files_for_instruction(&specs, &RunInstruction::RunSpec("/a.js".into())),
        vec![PathBuf::from("/a.js"), PathBuf::from("/b.js")]
    );
}

#[tokio::test]
async fn run_specs_passes_files_and_environment() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("check.sh"),
        "test \"$#\" -eq 2 && test \"$1\" = a.js && test \"$SPECWATCH_CID\" = 0-0 \
         && test \"$SPECWATCH_SESSION_ID\" = s-1\n",
    )
    .unwrap();

    let command = WorkerCommand {
        cmd: "sh check.sh".to_string(),
        cwd: dir.path().to_path_buf(),
    };
    let files = vec![PathBuf::from("a.js"), PathBuf::from("b.js")];

    let status = with_timeout(run_specs(&command, "0-0", "s-1", &files))
        .await
        .unwrap();
    assert!(status.success());

    let status = with_timeout(run_specs(&command, "0-1", "s-1", &files))
        .await
        .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn process_worker_reports_busy_then_idle_and_keeps_session() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let pool = WorkerPool::new();
    let command = WorkerCommand {
        cmd: "true".to_string(),
        cwd: dir.path().to_path_buf(),
    };

    let channel = spawn_process_worker("0-0", command, pool.clone());
    pool.insert(Worker::new(
        "0-0",
        vec![Spec::File("/a.js".into())],
        BTreeMap::new(),
        channel.clone(),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();
    channel.subscribe(StatusListener::new("0-0", tx));
    channel.post(RunInstruction::RunAll).unwrap();

    let mut states = Vec::new();
    while states.len() < 2 {
        match with_timeout(rx.recv()).await {
            Some(SchedulerEvent::Worker(WorkerStatus { cid, state })) => {
                assert_eq!(cid, "0-0");
                states.push(state);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
    assert_eq!(states, vec![WorkerState::Busy, WorkerState::Idle]);

    let worker = pool.get("0-0").unwrap();
    assert!(!worker.is_busy);
    let session = worker.session_id.expect("session recorded after first run");

    // A reuse keeps the session it was told to use.
    channel
        .post(RunInstruction::ReuseSession {
            session_id: session.clone(),
            spec: None,
        })
        .unwrap();
    for _ in 0..2 {
        with_timeout(rx.recv()).await.unwrap();
    }
    assert_eq!(pool.get("0-0").unwrap().session_id, Some(session));
}

#[tokio::test]
async fn removed_worker_stops_accepting_instructions() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let pool = WorkerPool::new();
    let command = WorkerCommand {
        cmd: "true".to_string(),
        cwd: dir.path().to_path_buf(),
    };
    let channel = spawn_process_worker("0-0", command, pool.clone());

    // Not in the pool: the loop exits on the first instruction.
    channel.post(RunInstruction::RunAll).unwrap();

    let mut rejected = false;
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        if channel.post(RunInstruction::RunAll).is_err() {
            rejected = true;
            break;
        }
    }
    assert!(rejected);
}

#[tokio::test]
async fn launcher_creates_one_worker_per_capability_and_spec() {
    init_tracing();

    let mut chrome = BTreeMap::new();
    chrome.insert("browserName".to_string(), "chrome".to_string());
    let mut firefox = BTreeMap::new();
    firefox.insert("browserName".to_string(), "firefox".to_string());

    let cfg = ConfigFileBuilder::new("true")
        .spec("tests/a.js")
        .group(&["tests/b.js", "tests/c.js"])
        .capabilities(vec![chrome, firefox])
        .build();

    let pool = WorkerPool::new();
    let root = Path::new("/proj");
    let created = populate_pool(&cfg, cfg.specs(), root, &pool);

    assert_eq!(created, 4);
    let workers = pool.snapshot();
    assert_eq!(
        workers.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["0-0", "0-1", "1-0", "1-1"]
    );

    let grouped = &workers["1-1"];
    assert_eq!(grouped.specs, vec![group(&["/proj/tests/b.js", "/proj/tests/c.js"])]);
    assert_eq!(
        grouped.capabilities.get("browserName").map(String::as_str),
        Some("firefox")
    );
    assert!(grouped.session_id.is_none());
    assert!(!grouped.is_busy);
}
