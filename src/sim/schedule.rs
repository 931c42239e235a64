//! Deferred actions keyed by tick
//!
//! Timed effects are queued here and drained at the start of a tick, so they
//! never interleave with entity updates.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A mutation to apply once its tick arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeferredAction {
    /// Halve the global explosion radius
    RevertRadiusBoost,
    /// Report victory and halt the run
    AnnounceVictory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    fire_tick: u64,
    /// Insertion order, so actions due on the same tick run FIFO
    seq: u64,
    action: DeferredAction,
}

/// Min-heap of (fire tick, action)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_tick: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            fire_tick,
            seq,
            action,
        }));
    }

    /// Remove and return every action due at or before `now`, in order
    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.fire_tick > now {
                break;
            }
            due.push(entry.action);
            self.queue.pop();
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
