// src/exec/launcher.rs

use std::path::Path;

use tracing::info;

use crate::config::ConfigFile;
use crate::exec::process_worker::spawn_process_worker;
use crate::exec::task_runner::WorkerCommand;
use crate::pool::{Worker, WorkerPool};
use crate::types::Spec;

/// Fill `pool` with one process worker per capability × spec.
///
/// Cids are `"<capability index>-<spec index>"`. Spec paths are anchored at
/// `root`. Must be called from inside a Tokio runtime.
pub fn populate_pool(cfg: &ConfigFile, specs: &[Spec], root: &Path, pool: &WorkerPool) -> usize {
    let command = WorkerCommand {
        cmd: cfg.runner.cmd.clone(),
        cwd: root.to_path_buf(),
    };

    let mut created = 0;
    for (cap_index, caps) in cfg.capabilities().iter().enumerate() {
        for (spec_index, spec) in specs.iter().enumerate() {
            let cid = format!("{cap_index}-{spec_index}");
            let channel = spawn_process_worker(cid.clone(), command.clone(), pool.clone());
            pool.insert(Worker::new(
                cid,
                vec![spec.anchored(root)],
                caps.clone(),
                channel,
            ));
            created += 1;
        }
    }

    info!(workers = created, "worker pool populated");
    created
}
