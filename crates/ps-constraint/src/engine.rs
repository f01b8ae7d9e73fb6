//! `ConstraintEngine` — owner of every `Waits` entry in a run.

use log::{debug, trace};

use ps_core::time::format_duration;
use ps_core::{EquipmentId, SimTime, TaskId};

use crate::{ConstraintError, ConstraintResult, EquipmentTaskKey, TimeConstraint, WaitCounter};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── Waits ─────────────────────────────────────────────────────────────────────

/// Every constraint registered for one `(equipment, task)` pair.
#[derive(Clone, Debug, Default)]
pub struct Waits {
    pub wait_ons:         Vec<WaitCounter>,
    pub time_constraints: Vec<TimeConstraint>,
}

impl Waits {
    /// Availability at `at`:
    ///
    /// 1. any wait counter still waiting (count above zero, or release delay
    ///    not yet elapsed) → unavailable;
    /// 2. any active allowing window → available, whatever else is active;
    /// 3. any active suppressing window, or any allowing window that has not
    ///    opened yet → unavailable;
    /// 4. otherwise available.
    pub fn is_available(&self, at: SimTime) -> bool {
        if self.wait_ons.iter().any(|w| w.is_waiting(at)) {
            return false;
        }
        if self.time_constraints.iter().any(|c| c.is_allowing() && c.is_active()) {
            return true;
        }
        !self.time_constraints.iter().any(|c| {
            (c.is_suppressing() && c.is_active()) || (c.is_allowing() && c.is_pending())
        })
    }
}

// ── Handles ───────────────────────────────────────────────────────────────────

/// Refers to one registered wait counter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CounterHandle {
    pub key:   EquipmentTaskKey,
    pub index: usize,
}

/// Refers to one registered time constraint.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct WindowHandle {
    pub key:   EquipmentTaskKey,
    pub index: usize,
}

// ── ConstraintEngine ──────────────────────────────────────────────────────────

/// All constraint state of one scheduling run.
///
/// Owned by the runtime and handed by reference to whatever evaluates task
/// availability.  Dropped with the run.
#[derive(Debug, Default)]
pub struct ConstraintEngine {
    waits:          Map<EquipmentTaskKey, Waits>,
    /// Predecessor task → counters that count it.
    by_predecessor: Map<TaskId, Vec<CounterHandle>>,
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration (setup) ──────────────────────────────────────────────

    pub fn add_wait(&mut self, key: EquipmentTaskKey, counter: WaitCounter) -> CounterHandle {
        let entry = self.waits.entry(key).or_default();
        let handle = CounterHandle { key, index: entry.wait_ons.len() };
        for &p in counter.predecessors() {
            self.by_predecessor.entry(p).or_default().push(handle);
        }
        debug!(
            "{key}: waiting on {} predecessor(s), release delay {}, from line {} ({})",
            counter.remaining(),
            format_duration(counter.release_delay()),
            counter.origin.line,
            counter.origin.directive
        );
        entry.wait_ons.push(counter);
        handle
    }

    pub fn add_time_constraint(&mut self, key: EquipmentTaskKey, window: TimeConstraint) -> WindowHandle {
        let entry = self.waits.entry(key).or_default();
        let handle = WindowHandle { key, index: entry.time_constraints.len() };
        debug!("{key}: {:?} window {} .. {}", window.mode(), window.start, window.end);
        entry.time_constraints.push(window);
        handle
    }

    // ── Transitions (run) ─────────────────────────────────────────────────

    /// Feed a task completion to every counter that waits on it.
    ///
    /// Returns how many counters were decremented.
    pub fn on_task_completed(&mut self, task: TaskId, at: SimTime) -> usize {
        let Some(handles) = self.by_predecessor.get(&task) else {
            return 0;
        };
        let mut decremented = 0;
        for h in handles {
            if let Some(counter) = self.waits.get_mut(&h.key).and_then(|w| w.wait_ons.get_mut(h.index)) {
                if counter.on_predecessor_completed(task, at) {
                    decremented += 1;
                    trace!("{}: {task} completed, {} remaining", h.key, counter.remaining());
                }
            }
        }
        decremented
    }

    pub fn activate(&mut self, handle: WindowHandle) -> ConstraintResult<()> {
        self.window_mut(handle)?.activate();
        Ok(())
    }

    pub fn deactivate(&mut self, handle: WindowHandle) -> ConstraintResult<()> {
        self.window_mut(handle)?.deactivate();
        Ok(())
    }

    fn window_mut(&mut self, handle: WindowHandle) -> ConstraintResult<&mut TimeConstraint> {
        self.waits
            .get_mut(&handle.key)
            .and_then(|w| w.time_constraints.get_mut(handle.index))
            .ok_or(ConstraintError::UnknownWindow { key: handle.key, index: handle.index })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The availability predicate installed on the scheduler.
    pub fn is_available(&self, equipment: EquipmentId, task: TaskId, at: SimTime) -> bool {
        self.waits
            .get(&EquipmentTaskKey::new(equipment, task))
            .is_none_or(|w| w.is_available(at))
    }

    pub fn waits(&self, key: EquipmentTaskKey) -> Option<&Waits> {
        self.waits.get(&key)
    }

    pub fn counter(&self, handle: CounterHandle) -> Option<&WaitCounter> {
        self.waits.get(&handle.key)?.wait_ons.get(handle.index)
    }

    pub fn window(&self, handle: WindowHandle) -> Option<&TimeConstraint> {
        self.waits.get(&handle.key)?.time_constraints.get(handle.index)
    }

    /// Number of keys with at least one constraint.
    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    pub fn counter_count(&self) -> usize {
        self.waits.values().map(|w| w.wait_ons.len()).sum()
    }

    pub fn window_count(&self) -> usize {
        self.waits.values().map(|w| w.time_constraints.len()).sum()
    }
}
