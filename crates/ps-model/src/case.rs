//! `Case` — the processes, tasks and equipment of one scheduling scenario.

use ps_core::{EquipmentId, ProcessId, TaskId};

use crate::{Equipment, ModelError, ModelResult, TaskGraph, TaskRole};

#[derive(Clone, Debug)]
pub struct Process {
    pub id:         ProcessId,
    pub name:       String,
    pub active:     bool,
    pub productive: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Case {
    pub name:      String,
    pub processes: Vec<Process>,
    pub tasks:     TaskGraph,
    pub equipment: Vec<Equipment>,
}

impl Case {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Register a process and return its id.
    pub fn add_process(&mut self, name: impl Into<String>, productive: bool) -> ProcessId {
        let id = ProcessId(self.processes.len() as u16);
        self.processes.push(Process { id, name: name.into(), active: true, productive });
        id
    }

    /// Register an equipment with its source path text (not yet compiled).
    pub fn add_equipment(&mut self, name: impl Into<String>, path_text: impl Into<String>) -> EquipmentId {
        let id = EquipmentId(self.equipment.len() as u32);
        self.equipment.push(Equipment::new(id, name, path_text));
        id
    }

    /// Case-insensitive process lookup.
    pub fn process_by_name(&self, name: &str) -> ModelResult<ProcessId> {
        self.processes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .map(|p| p.id)
            .ok_or_else(|| ModelError::UnknownProcess(name.trim().to_string()))
    }

    pub fn process_name(&self, id: ProcessId) -> Option<&str> {
        self.processes.get(id.index()).map(|p| p.name.as_str())
    }

    /// Case-insensitive equipment lookup.
    pub fn equipment_by_name(&self, name: &str) -> ModelResult<EquipmentId> {
        self.equipment
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .map(|e| e.id)
            .ok_or_else(|| ModelError::UnknownEquipment(name.trim().to_string()))
    }

    pub fn equipment(&self, id: EquipmentId) -> ModelResult<&Equipment> {
        self.equipment.get(id.index()).ok_or(ModelError::UnknownEquipmentId(id))
    }

    pub fn equipment_mut(&mut self, id: EquipmentId) -> ModelResult<&mut Equipment> {
        self.equipment.get_mut(id.index()).ok_or(ModelError::UnknownEquipmentId(id))
    }

    /// First task with this name and role, compared case-insensitively.
    pub fn find_task(&self, name: &str, role: TaskRole) -> Option<TaskId> {
        self.tasks
            .iter()
            .find(|t| t.role == role && t.name.eq_ignore_ascii_case(name))
            .map(|t| t.id)
    }
}
