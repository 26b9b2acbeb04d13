// src/engine/core.rs

//! Pure dispatch planning.
//!
//! Given the live pool and a [`RunInstruction`], decide which workers run
//! and what each of them is told. No channels, no IO: the [`Scheduler`]
//! executes the plan.
//!
//! [`Scheduler`]: crate::engine::Scheduler

use std::path::Path;

use crate::engine::RunInstruction;
use crate::pool::{Worker, WorkerMap, WorkerPool};
use crate::reporter::JobStart;
use crate::types::SpecRestriction;

/// One planned send: the worker and the instruction it receives.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub worker: Worker,
    pub instruction: RunInstruction,
}

impl Dispatch {
    /// Job-start notice for this dispatch. It always names the worker's full
    /// assignment, even when only one file is re-run.
    pub fn job(&self) -> JobStart {
        JobStart {
            cid: self.worker.cid.clone(),
            caps: self.worker.capabilities.clone(),
            specs: self.worker.specs.clone(),
        }
    }
}

/// Plan the sends for `instruction` against the pool as it is right now.
///
/// - `RunSpec(path)`: idle workers whose specs contain `path`. With a
///   restriction, a worker only qualifies if `path` is inside the
///   restriction or its whole assignment is covered by it.
/// - `RunAll`: every worker, busy or not; the restriction is ignored.
/// - `ReuseSession`: the worker owning that session, busy or not.
///
/// The result follows pool iteration order. An empty plan is a valid
/// outcome.
pub fn plan_dispatch(
    pool: &WorkerPool,
    instruction: &RunInstruction,
    restriction: Option<&SpecRestriction>,
) -> Vec<Dispatch> {
    match instruction {
        RunInstruction::RunSpec(path) => {
            let eligible = |w: &Worker| w.runs_spec(path) && passes_restriction(w, path, restriction);
            let workers = pool.get_workers(Some(&eligible), false);
            rerun_each(workers, Some(path))
        }
        RunInstruction::RunAll => rerun_each(pool.get_workers(None, true), None),
        RunInstruction::ReuseSession { session_id, spec } => {
            let owns_session = |w: &Worker| w.session_id.as_deref() == Some(session_id.as_str());
            pool.get_workers(Some(&owns_session), true)
                .into_values()
                .map(|worker| Dispatch {
                    worker,
                    instruction: RunInstruction::ReuseSession {
                        session_id: session_id.clone(),
                        spec: spec.clone(),
                    },
                })
                .collect()
        }
    }
}

fn passes_restriction(worker: &Worker, path: &Path, restriction: Option<&SpecRestriction>) -> bool {
    match restriction {
        None => true,
        Some(r) => r.admits(path) || r.covers(&worker.specs),
    }
}

fn rerun_each(workers: WorkerMap, spec: Option<&Path>) -> Vec<Dispatch> {
    workers
        .into_values()
        .map(|worker| {
            let instruction = worker.rerun_instruction(spec);
            Dispatch {
                worker,
                instruction,
            }
        })
        .collect()
}
