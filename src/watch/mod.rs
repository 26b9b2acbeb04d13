// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Deriving the two typed watch targets (spec files and `files_to_watch`)
//!   from the live pool and the config.
//! - Compiling their glob patterns against the project root.
//! - Wiring up a cross-platform filesystem watcher (`notify`) behind the
//!   [`FileWatchService`] trait.
//!
//! It does **not** decide what to re-run; it only reports which target a
//! changed file belongs to.

pub mod notify_service;
pub mod patterns;
pub mod service;
pub mod target;

pub use notify_service::NotifyWatchService;
pub use patterns::{anchor_pattern, literal_base, watch_base, CompiledTarget};
pub use service::{ChangeKind, FileChange, FileWatchService, WatchHandle};
pub use target::{build_watch_targets, TargetKind, WatchTarget};
