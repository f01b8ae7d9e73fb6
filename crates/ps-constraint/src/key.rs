//! Map key and provenance record.

use std::fmt;

use ps_core::{EquipmentId, TaskId};

/// The `(equipment, task)` pair a constraint is attached to.
///
/// Equality and hashing are structural, so keys built independently for the
/// same pair always meet in the same map slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EquipmentTaskKey {
    pub equipment: EquipmentId,
    pub task:      TaskId,
}

impl EquipmentTaskKey {
    #[inline]
    pub fn new(equipment: EquipmentId, task: TaskId) -> Self {
        Self { equipment, task }
    }
}

impl fmt::Display for EquipmentTaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.equipment, self.task)
    }
}

/// Where a constraint came from: the path line and directive that made it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourceLine {
    pub line:      usize,
    pub text:      String,
    pub directive: &'static str,
}
