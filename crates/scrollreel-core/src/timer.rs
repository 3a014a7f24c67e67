//! Deadline-ordered one-shot timers.
//!
//! The queue never looks at a clock. Callers schedule against an `Instant`
//! and later ask for everything due at some `now`, so the same code runs
//! under a real event loop and under a hand-driven test clock.

use slotmap::{SlotMap, new_key_type};
use web_time::Instant;

new_key_type! {
    pub struct TimerKey;
}

struct Entry<T> {
    deadline: Instant,
    seq: u64,
    payload: T,
}

pub struct TimerQueue<T> {
    entries: SlotMap<TimerKey, Entry<T>>,
    seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerKey {
        self.seq += 1;
        self.entries.insert(Entry {
            deadline,
            seq: self.seq,
            payload,
        })
    }

    /// Cancel-and-reschedule: drops whatever `slot` points at, then arms a
    /// new timer and stores its key back into `slot`.
    pub fn reschedule(&mut self, slot: &mut Option<TimerKey>, deadline: Instant, payload: T) {
        if let Some(old) = slot.take() {
            self.entries.remove(old);
        }
        *slot = Some(self.schedule(deadline, payload));
    }

    /// Cancels the timer in `slot`, if any, and empties the slot.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerKey>) {
        if let Some(key) = slot.take() {
            self.entries.remove(key);
        }
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.values().map(|e| e.deadline).min()
    }

    /// Removes and returns the earliest timer due at `now`. Ties go to the
    /// one scheduled first.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerKey, T)> {
        let key = self
            .entries
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.seq))
            .map(|(k, _)| k)?;
        self.entries.remove(key).map(|e| (key, e.payload))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
