// src/exec/mod.rs

//! Reference runner.
//!
//! The scheduler never spawns processes itself. This module is the runner
//! the `specwatch` binary uses to populate the pool:
//!
//! - [`launcher`] creates one worker per capability × spec.
//! - [`process_worker`] owns each worker's instruction loop and implements
//!   [`crate::pool::WorkerChannel`].
//! - [`task_runner`] runs a single batch of spec files as a child process.

pub mod launcher;
pub mod process_worker;
pub mod task_runner;

pub use launcher::populate_pool;
pub use process_worker::{spawn_process_worker, ProcessWorker};
pub use task_runner::{run_specs, WorkerCommand};
