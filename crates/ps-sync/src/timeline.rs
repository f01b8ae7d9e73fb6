//! `Timeline` — dated action queue standing in for the scheduler's time-keeper.
//!
//! Actions fire in non-decreasing date order.  Actions pushed for the same
//! instant fire in push order.

use std::collections::BTreeMap;

use ps_core::SimTime;

use crate::Action;

#[derive(Debug, Default)]
pub struct Timeline {
    inner: BTreeMap<SimTime, Vec<Action>>,
    /// Cached total action count for O(1) `len()`.
    total: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` for `at`.
    pub fn push(&mut self, at: SimTime, action: Action) {
        self.inner.entry(at).or_default().push(action);
        self.total += 1;
    }

    /// Remove and return the earliest batch if it is due at or before `now`.
    ///
    /// Callers loop on this: applying a batch may push more actions at or
    /// before `now`, and those must fire in the same advance.
    pub fn pop_due(&mut self, now: SimTime) -> Option<(SimTime, Vec<Action>)> {
        let entry = self.inner.first_entry()?;
        if *entry.key() > now {
            return None;
        }
        let (at, actions) = entry.remove_entry();
        self.total -= actions.len();
        Some((at, actions))
    }

    /// The earliest date with a queued action.
    pub fn next_date(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct dates with at least one queued action.
    pub fn date_count(&self) -> usize {
        self.inner.len()
    }
}
