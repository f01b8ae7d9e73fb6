//! `TimeConstraint` — a dated window that suppresses or allows a task.

use ps_core::{SimTime, TimeMode};

use crate::SourceLine;

/// A window `[start, end)` during which a task's availability is overridden.
///
/// `active` only changes through [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate), which the runtime calls from callbacks
/// scheduled at `start` and `end`.
#[derive(Clone, Debug)]
pub struct TimeConstraint {
    mode:       TimeMode,
    pub start:  SimTime,
    pub end:    SimTime,
    active:     bool,
    started:    bool,
    pub origin: SourceLine,
}

impl TimeConstraint {
    pub fn new(mode: TimeMode, start: SimTime, end: SimTime, origin: SourceLine) -> Self {
        Self { mode, start, end, active: false, started: false, origin }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    #[inline]
    pub fn is_suppressing(&self) -> bool {
        self.mode == TimeMode::Suppress
    }

    #[inline]
    pub fn is_allowing(&self) -> bool {
        self.mode == TimeMode::Allow
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` before the start callback has fired.
    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.started
    }

    pub(crate) fn activate(&mut self) {
        self.started = true;
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.started = true;
        self.active = false;
    }
}
