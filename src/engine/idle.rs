// src/engine/idle.rs

//! Pool-wide idle detection.

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::Cid;

/// Tracks which workers are busy and decides when the pool has drained.
///
/// The check is level-triggered on the aggregate: it fires when the busy
/// set is empty, but at most once per idle stretch. Any worker becoming
/// busy re-arms it.
#[derive(Debug, Default)]
pub struct IdleTracker {
    busy: BTreeSet<Cid>,
    finalised: bool,
}

impl IdleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the busy set, e.g. from the pool's flags at watch time.
    pub fn seed<I>(&mut self, busy: I)
    where
        I: IntoIterator<Item = Cid>,
    {
        self.busy = busy.into_iter().collect();
        if !self.busy.is_empty() {
            self.finalised = false;
        }
    }

    pub fn mark_busy(&mut self, cid: &str) {
        self.busy.insert(cid.to_string());
        self.finalised = false;
    }

    /// Record that `cid` finished. Returns `true` exactly when this
    /// completion takes the pool into a new idle stretch.
    pub fn mark_idle(&mut self, cid: &str) -> bool {
        self.release(cid);
        self.check()
    }

    /// Forget `cid` without checking for idle.
    pub fn release(&mut self, cid: &str) {
        self.busy.remove(cid);
    }

    /// Drop workers that left the pool, so a vanished busy worker cannot
    /// keep the pool busy forever.
    pub fn retain<F>(&mut self, mut still_present: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.busy.retain(|cid| still_present(cid));
    }

    /// Returns `true` if the pool is idle and has not been finalised in
    /// this idle stretch yet; marks it finalised.
    pub fn check(&mut self) -> bool {
        if !self.busy.is_empty() {
            debug!(busy = self.busy.len(), "pool still busy");
            return false;
        }
        if self.finalised {
            return false;
        }
        self.finalised = true;
        true
    }

    pub fn busy_count(&self) -> usize {
        self.busy.len()
    }

    pub fn is_idle(&self) -> bool {
        self.busy.is_empty()
    }
}
