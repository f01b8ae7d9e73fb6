//! Tasks and the predecessor graph between them.
//!
//! A task is one schedulable unit of work — a source block to be drilled or
//! loaded, or a destination to be filled.  Each task carries its own
//! predecessor edges; successors are never stored, so edits only ever touch
//! the successor side.

use std::collections::BTreeSet;

use chrono::Duration;

use ps_core::{ProcessId, SimTime, TaskId};

use crate::{ModelError, ModelResult};

// ── Task ──────────────────────────────────────────────────────────────────────

/// Which side of a path step a task sits on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TaskRole {
    Source,
    Destination,
}

/// A predecessor edge: the owning task may not start until `predecessor` has
/// completed and `delay` has elapsed since.
#[derive(Clone, Debug, PartialEq)]
pub struct Dependency {
    pub predecessor: TaskId,
    pub delay:       Duration,
    /// Name of the rule that created the edge (e.g. `"dependon"`).
    pub rule:        String,
}

#[derive(Clone, Debug)]
pub struct Task {
    pub id:           TaskId,
    /// Block or destination name, e.g. `A/1/2`.
    pub name:         String,
    pub role:         TaskRole,
    pub process:      ProcessId,
    /// Planned quantity (tonnes, metres, ...).
    pub quantity:     f64,
    pub predecessors: Vec<Dependency>,
    /// Set once, by [`TaskGraph::complete`].
    pub completed_at: Option<SimTime>,
}

impl Task {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

// ── TaskGraph ─────────────────────────────────────────────────────────────────

/// All tasks of a case, indexed by `TaskId`.
#[derive(Clone, Debug, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task with no predecessors and return its id.
    pub fn add_task(
        &mut self,
        name:     impl Into<String>,
        role:     TaskRole,
        process:  ProcessId,
        quantity: f64,
    ) -> TaskId {
        let id = TaskId(self.tasks.len() as u32);
        self.tasks.push(Task {
            id,
            name: name.into(),
            role,
            process,
            quantity,
            predecessors: Vec::new(),
            completed_at: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> ModelResult<&Task> {
        self.tasks.get(id.index()).ok_or(ModelError::UnknownTask(id))
    }

    pub fn get_mut(&mut self, id: TaskId) -> ModelResult<&mut Task> {
        self.tasks.get_mut(id.index()).ok_or(ModelError::UnknownTask(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Direct predecessors of `id`, in edge order.  Unknown ids have none.
    pub fn direct_predecessors(&self, id: TaskId) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks
            .get(id.index())
            .into_iter()
            .flat_map(|t| t.predecessors.iter().map(|d| d.predecessor))
    }

    /// Union of the direct predecessors of every task in `tasks` that are not
    /// themselves members of `tasks`.
    pub fn external_predecessors(&self, tasks: &BTreeSet<TaskId>) -> BTreeSet<TaskId> {
        tasks
            .iter()
            .flat_map(|&t| self.direct_predecessors(t))
            .filter(|p| !tasks.contains(p))
            .collect()
    }

    /// Add a predecessor edge to `task`.
    ///
    /// At most one edge per predecessor is kept: adding an edge that already
    /// exists replaces its delay and rule tag.  Self-edges are ignored.
    /// Returns `true` if a new edge was created.
    pub fn add_dependency(&mut self, task: TaskId, dependency: Dependency) -> ModelResult<bool> {
        if dependency.predecessor == task {
            return Ok(false);
        }
        self.get(dependency.predecessor)?;
        let t = self.get_mut(task)?;
        match t.predecessors.iter_mut().find(|d| d.predecessor == dependency.predecessor) {
            Some(existing) => {
                *existing = dependency;
                Ok(false)
            }
            None => {
                t.predecessors.push(dependency);
                Ok(true)
            }
        }
    }

    /// Remove predecessor edges from `task`.
    ///
    /// With `only = Some(set)`, only edges whose predecessor is in `set` are
    /// removed.  Returns the number of edges removed.
    pub fn remove_dependencies(
        &mut self,
        task: TaskId,
        only: Option<&BTreeSet<TaskId>>,
    ) -> ModelResult<usize> {
        let t = self.get_mut(task)?;
        let before = t.predecessors.len();
        t.predecessors
            .retain(|d| only.is_some_and(|set| !set.contains(&d.predecessor)));
        Ok(before - t.predecessors.len())
    }

    /// Mark `task` completed at `at`.
    ///
    /// Completion fires once: returns `false` (and keeps the first date) if
    /// the task had already completed.
    pub fn complete(&mut self, task: TaskId, at: SimTime) -> ModelResult<bool> {
        let t = self.get_mut(task)?;
        if t.completed_at.is_some() {
            return Ok(false);
        }
        t.completed_at = Some(at);
        Ok(true)
    }

    pub fn is_complete(&self, task: TaskId) -> bool {
        self.tasks.get(task.index()).is_some_and(Task::is_complete)
    }

    /// `true` if every predecessor of `task` completed at least its edge delay
    /// before `at`.
    pub fn dependencies_satisfied(&self, task: TaskId, at: SimTime) -> bool {
        let Some(t) = self.tasks.get(task.index()) else {
            return true;
        };
        t.predecessors.iter().all(|d| {
            self.tasks
                .get(d.predecessor.index())
                .and_then(|p| p.completed_at)
                .is_some_and(|done| done.checked_add_signed(d.delay).is_some_and(|ready| at >= ready))
        })
    }
}
