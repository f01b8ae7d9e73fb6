//! Pending effects: what a directive wants done, and when.
//!
//! The interpreter never touches the case or the constraint engine.  It
//! returns [`Registration`]s (constraint records to install) and [`Effect`]s
//! (actions with a trigger), and [`SyncRuntime`][crate::SyncRuntime] applies
//! them once the whole path has parsed.

use std::collections::BTreeSet;

use ps_constraint::{EquipmentTaskKey, TimeConstraint, WaitCounter, WindowHandle};
use ps_core::{ElementId, EquipmentId, ProcessId, SimDuration, SimTime, TaskId};
use ps_model::PathStep;

/// A constraint record to install in the engine at commit.
#[derive(Clone, Debug)]
pub enum Registration {
    Wait { key: EquipmentTaskKey, counter: WaitCounter },
    /// Installing a window also schedules its start and end callbacks.
    Window { key: EquipmentTaskKey, window: TimeConstraint },
}

/// A mutation of the case or the constraint engine.
#[derive(Clone, PartialEq, Debug)]
pub enum Action {
    /// Add an edge from every predecessor to every task.
    AddDependencies {
        tasks:        BTreeSet<TaskId>,
        predecessors: BTreeSet<TaskId>,
        delay:        SimDuration,
        rule:         &'static str,
    },
    /// Drop predecessor edges of `tasks`, optionally only those from `only`.
    RemoveDependencies { tasks: BTreeSet<TaskId>, only: Option<BTreeSet<TaskId>> },
    /// Take elements out of an equipment path.  Already-removed ids are skipped.
    RemoveElements { equipment: EquipmentId, elements: Vec<ElementId> },
    /// Book idle time at the front of the path.
    InsertIdle { equipment: EquipmentId, line: usize, process: ProcessId, duration: SimDuration },
    /// Put an instant-completion step group at the front of the path for
    /// every step whose source task is still incomplete when this fires.
    ForceComplete {
        equipment:          EquipmentId,
        line:               usize,
        steps:              Vec<PathStep>,
        ignore_constraints: bool,
    },
    MoveToFront { equipment: EquipmentId, elements: Vec<ElementId> },
    /// Insert one element per step, each after the previous, starting after
    /// `after`.
    InsertSteps { equipment: EquipmentId, line: usize, after: ElementId, steps: Vec<PathStep> },
    ActivateWindow(WindowHandle),
    DeactivateWindow(WindowHandle),
}

impl Action {
    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddDependencies { .. } => "add-dependencies",
            Self::RemoveDependencies { .. } => "remove-dependencies",
            Self::RemoveElements { .. } => "remove-elements",
            Self::InsertIdle { .. } => "insert-idle",
            Self::ForceComplete { .. } => "force-complete",
            Self::MoveToFront { .. } => "move-to-front",
            Self::InsertSteps { .. } => "insert-steps",
            Self::ActivateWindow(_) => "activate-window",
            Self::DeactivateWindow(_) => "deactivate-window",
        }
    }
}

/// An action and what triggers it.
#[derive(Clone, PartialEq, Debug)]
pub enum Effect {
    /// Apply at commit.
    Now(Action),
    /// Apply when simulated time reaches the date.
    At(SimTime, Action),
    /// Apply `delay` after the last of `tasks` completes.
    OnCompletion { tasks: BTreeSet<TaskId>, delay: SimDuration, action: Action },
    /// Apply once, when `equipment` releases a task it had selected on one of
    /// `elements`.
    OnSelection { equipment: EquipmentId, elements: Vec<ElementId>, action: Action },
}

/// Everything one path line asks for.
#[derive(Clone, Debug, Default)]
pub struct LineOutcome {
    pub registrations: Vec<Registration>,
    pub effects:       Vec<Effect>,
}

impl LineOutcome {
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty() && self.effects.is_empty()
    }

    /// Append `other`, keeping line order.
    pub fn extend(&mut self, other: LineOutcome) {
        self.registrations.extend(other.registrations);
        self.effects.extend(other.effects);
    }
}
