// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pool;
pub mod reporter;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{config_root_dir, load_and_validate, ConfigFile, ConfigProvider};
use crate::engine::{RunInstruction, Runtime, Scheduler, SchedulerEvent};
use crate::exec::populate_pool;
use crate::pool::WorkerPool;
use crate::reporter::ConsoleReporter;
use crate::types::{Spec, SpecRestriction};
use crate::watch::NotifyWatchService;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the reference runner populating the worker pool
/// - scheduler + file watch registrations
/// - the initial full run
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = config_root_dir(&config_path);
    let root = root.canonicalize().unwrap_or(root);

    // `--spec` replaces the configured specs and restricts spec events.
    let restriction = args
        .spec_restriction()
        .map(|specs| SpecRestriction::new(specs).anchored(&root));
    let specs: Vec<Spec> = match &restriction {
        Some(r) => r.specs().to_vec(),
        None => cfg.specs().to_vec(),
    };

    if args.dry_run {
        print_dry_run(&cfg, &specs, &root);
        return Ok(());
    }

    let pool = WorkerPool::new();
    populate_pool(&cfg, &specs, &root, &pool);

    // Scheduler event channel.
    let (tx, rx) = mpsc::unbounded_channel::<SchedulerEvent>();

    let mut scheduler =
        Scheduler::new(pool, ConsoleReporter::new(), tx.clone()).with_restriction(restriction);
    let mut service = NotifyWatchService::new(&root);
    scheduler.watch(&cfg, &mut service)?;

    // Ctrl-C -> graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(SchedulerEvent::ShutdownRequested);
        });
    }

    info!("starting initial run");
    tx.send(SchedulerEvent::RunRequested(RunInstruction::RunAll))?;

    let runtime = Runtime::new(scheduler, rx);
    let scheduler = runtime.run().await;
    debug!(?scheduler, "runtime stopped");
    Ok(())
}

/// Dry-run output: workers that would be created and the watch targets.
fn print_dry_run(cfg: &ConfigFile, specs: &[Spec], root: &Path) {
    println!("specwatch dry-run");
    println!("  root = {}", root.display());
    println!("  runner.cmd = {}", cfg.runner.cmd);
    println!();

    println!("workers ({}):", cfg.capabilities().len() * specs.len());
    for (cap_index, caps) in cfg.capabilities().iter().enumerate() {
        for (spec_index, spec) in specs.iter().enumerate() {
            println!("  - {cap_index}-{spec_index}");
            println!("      spec: {}", spec.anchored(root));
            if !caps.is_empty() {
                println!("      capabilities: {:?}", caps);
            }
        }
    }
    println!();

    let spec_files: Vec<String> = specs
        .iter()
        .map(|s| s.anchored(root))
        .flat_map(|s| s.files().map(|f| f.display().to_string()).collect::<Vec<_>>())
        .collect();
    println!("watch targets:");
    println!("  specs: {:?}", spec_files);

    let files_to_watch = cfg.files_to_watch();
    if !files_to_watch.is_empty() {
        println!("  files_to_watch: {:?}", files_to_watch);
    }

    debug!("dry-run complete (no execution)");
}
