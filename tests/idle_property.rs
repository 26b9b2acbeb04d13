// tests/idle_property.rs

use std::collections::BTreeSet;

use proptest::prelude::*;
use specwatch::engine::IdleTracker;

#[derive(Debug, Clone)]
enum Op {
    Busy(usize),
    Idle(usize),
}

fn op_strategy(workers: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..workers).prop_map(Op::Busy),
        (0..workers).prop_map(Op::Idle),
    ]
}

proptest! {
    #[test]
    fn finalise_fires_once_per_idle_stretch(
        ops in proptest::collection::vec(op_strategy(4), 1..60)
    ) {
        let mut tracker = IdleTracker::new();
        let mut busy: BTreeSet<usize> = BTreeSet::new();
        let mut fired_since_busy = false;

        for op in ops {
            match op {
                Op::Busy(i) => {
                    tracker.mark_busy(&i.to_string());
                    busy.insert(i);
                    fired_since_busy = false;
                }
                Op::Idle(i) => {
                    busy.remove(&i);
                    let fired = tracker.mark_idle(&i.to_string());

                    // Never twice in the same idle stretch.
                    prop_assert!(!(fired && fired_since_busy));
                    // Only when nothing is busy.
                    if fired {
                        prop_assert!(busy.is_empty());
                    }
                    // Always when the pool just drained and has not fired yet.
                    if busy.is_empty() && !fired_since_busy {
                        prop_assert!(fired);
                    }
                    fired_since_busy |= fired;
                }
            }
            prop_assert_eq!(tracker.busy_count(), busy.len());
            prop_assert_eq!(tracker.is_idle(), busy.is_empty());
        }
    }

    #[test]
    fn draining_every_worker_ends_idle(
        workers in proptest::collection::btree_set(0..16usize, 1..8)
    ) {
        let mut tracker = IdleTracker::new();
        tracker.seed(workers.iter().map(|i| i.to_string()));

        let mut fired = 0;
        for i in &workers {
            if tracker.mark_idle(&i.to_string()) {
                fired += 1;
            }
        }

        prop_assert!(tracker.is_idle());
        prop_assert_eq!(fired, 1);
        prop_assert!(!tracker.check());
    }
}
