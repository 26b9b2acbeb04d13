// src/pool/registry.rs

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::pool::worker::Worker;
use crate::types::Cid;

/// `cid -> Worker`, iterated in key order.
pub type WorkerMap = BTreeMap<Cid, Worker>;

/// Shared, live handle to the worker pool.
///
/// Cloning the handle shares the same pool. The runner mutates it; the
/// scheduler reads it on every call and never keeps a copy across calls.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    inner: Arc<RwLock<WorkerMap>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a worker.
    pub fn insert(&self, worker: Worker) {
        self.write().insert(worker.cid.clone(), worker);
    }

    pub fn remove(&self, cid: &str) -> Option<Worker> {
        self.write().remove(cid)
    }

    /// Mutate a worker in place. Returns `false` if the cid is unknown.
    pub fn update<F>(&self, cid: &str, f: F) -> bool
    where
        F: FnOnce(&mut Worker),
    {
        match self.write().get_mut(cid) {
            Some(worker) => {
                f(worker);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, cid: &str) -> Option<Worker> {
        self.read().get(cid).cloned()
    }

    pub fn contains(&self, cid: &str) -> bool {
        self.read().contains_key(cid)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of the whole pool as it is right now.
    pub fn snapshot(&self) -> WorkerMap {
        self.read().clone()
    }

    /// Select workers from the live pool.
    ///
    /// - A worker is only included if `include_busy` is true or it is not
    ///   busy.
    /// - If `predicate` is given, the worker must also satisfy it.
    ///
    /// The result is a new map keyed by the original cids; the pool itself
    /// is never modified.
    pub fn get_workers(
        &self,
        predicate: Option<&dyn Fn(&Worker) -> bool>,
        include_busy: bool,
    ) -> WorkerMap {
        self.read()
            .iter()
            .filter(|(_, w)| include_busy || !w.is_busy)
            .filter(|(_, w)| predicate.is_none_or(|p| p(*w)))
            .map(|(cid, w)| (cid.clone(), w.clone()))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, WorkerMap> {
        // Poisoning only records that a writer panicked; the map stays usable.
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WorkerMap> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
