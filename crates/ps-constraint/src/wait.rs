//! `WaitCounter` — countdown of predecessor completions.

use std::collections::BTreeSet;

use chrono::Duration;

use ps_core::{SimTime, TaskId};

use crate::SourceLine;

/// Counts the predecessor tasks a successor still waits on.
///
/// Starts at `|predecessors|` and drops by one the first time each
/// predecessor reports completion.  Reaching zero does not release the
/// successor on its own: `release_delay` must also have elapsed since the
/// decrement that brought the count to zero.
#[derive(Clone, Debug)]
pub struct WaitCounter {
    remaining:        usize,
    last_decremented: Option<SimTime>,
    release_delay:    Duration,
    predecessors:     BTreeSet<TaskId>,
    completed:        BTreeSet<TaskId>,
    pub origin:       SourceLine,
}

impl WaitCounter {
    pub fn new(predecessors: BTreeSet<TaskId>, release_delay: Duration, origin: SourceLine) -> Self {
        Self {
            remaining: predecessors.len(),
            last_decremented: None,
            release_delay,
            predecessors,
            completed: BTreeSet::new(),
            origin,
        }
    }

    /// Record that `task` completed at `at`.
    ///
    /// Returns `true` if this decremented the counter.  Tasks that are not
    /// predecessors, and predecessors already counted, leave it unchanged.
    pub fn on_predecessor_completed(&mut self, task: TaskId, at: SimTime) -> bool {
        if !self.predecessors.contains(&task) || !self.completed.insert(task) {
            return false;
        }
        self.remaining -= 1;
        self.last_decremented = Some(at);
        true
    }

    /// `true` while the successor must keep waiting at `at`.
    ///
    /// A release instant beyond the end of the calendar is never reached.
    pub fn is_waiting(&self, at: SimTime) -> bool {
        self.remaining > 0
            || self
                .last_decremented
                .is_some_and(|t| t.checked_add_signed(self.release_delay).is_none_or(|r| at < r))
    }

    /// The instant the successor is released, once the count has reached zero
    /// and the release lies on the calendar.
    pub fn released_at(&self) -> Option<SimTime> {
        match (self.remaining, self.last_decremented) {
            (0, Some(t)) => t.checked_add_signed(self.release_delay),
            _ => None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn release_delay(&self) -> Duration {
        self.release_delay
    }

    pub fn last_decremented(&self) -> Option<SimTime> {
        self.last_decremented
    }

    pub fn predecessors(&self) -> &BTreeSet<TaskId> {
        &self.predecessors
    }
}
