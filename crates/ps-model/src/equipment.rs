//! Equipment: a named machine with a source path and its compiled elements.

use ps_core::{ElementId, EquipmentId, ProcessId, TaskId};

use crate::EquipmentPath;

/// What an equipment is currently working on.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ActiveWork {
    pub element: ElementId,
    pub task:    TaskId,
}

#[derive(Clone, Debug)]
pub struct Equipment {
    pub id:               EquipmentId,
    pub name:             String,
    /// The planner-authored path text, directives included.
    pub path_text:        String,
    /// Remaining path elements, in work order.
    pub path:             EquipmentPath,
    /// Process that idle time is booked against when a directive names none.
    pub inactive_process: Option<ProcessId>,
    pub active:           Option<ActiveWork>,
}

impl Equipment {
    pub fn new(id: EquipmentId, name: impl Into<String>, path_text: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path_text: path_text.into(),
            path: EquipmentPath::new(),
            inactive_process: None,
            active: None,
        }
    }

    /// Record that the scheduler selected `task` on `element`.
    pub fn select(&mut self, element: ElementId, task: TaskId) {
        self.active = Some(ActiveWork { element, task });
    }

    /// Record that the scheduler released the current task, returning it.
    pub fn release(&mut self) -> Option<ActiveWork> {
        self.active.take()
    }
}
