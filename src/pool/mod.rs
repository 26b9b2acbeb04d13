// src/pool/mod.rs

//! The worker pool as seen by the scheduler.
//!
//! Workers are created, mutated and destroyed by a runner the scheduler does
//! not own (see [`crate::exec`] for the reference one). The scheduler only
//! reads the live pool and talks to workers through their [`WorkerChannel`].

pub mod registry;
pub mod worker;

pub use registry::{WorkerMap, WorkerPool};
pub use worker::{StatusListener, Worker, WorkerChannel, WorkerState, WorkerStatus};
