//! Equipment path elements and the ordered path list.
//!
//! An equipment works its path front to back.  Every element remembers the
//! source-text line it was generated from so directives on that line can
//! find it again.

use chrono::Duration;

use ps_core::{ElementId, ProcessId, SimTime, TaskId};

// ── PathStep ──────────────────────────────────────────────────────────────────

/// How fast a step is worked.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub enum StepRate {
    /// Use the productivity the scheduling engine computes.
    #[default]
    Planned,
    /// Fixed rate in quantity per hour.
    PerHour(f64),
    /// Completes the moment it is selected.
    Instant,
}

/// One unit of work inside a step group.
#[derive(Clone, PartialEq, Debug)]
pub struct PathStep {
    pub source:             TaskId,
    pub destination:        Option<TaskId>,
    /// Quantity to move; `None` means whatever remains on the source.
    pub quantity:           Option<f64>,
    /// Fixed duration; `None` lets the engine derive it from the rate.
    pub duration:           Option<Duration>,
    pub rate:               StepRate,
    /// Skip dependency and constraint checks when selecting this step.
    pub ignore_constraints: bool,
}

impl PathStep {
    /// A plain step at planned rate with no overrides.
    pub fn planned(source: TaskId, destination: Option<TaskId>) -> Self {
        Self {
            source,
            destination,
            quantity:           None,
            duration:           None,
            rate:               StepRate::Planned,
            ignore_constraints: false,
        }
    }

    /// Source and destination (when present), in that order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        std::iter::once(self.source).chain(self.destination)
    }
}

// ── PathElement ───────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
pub enum ElementKind {
    /// A group of steps worked together.
    Steps(Vec<PathStep>),
    /// Stand idle for a fixed span.
    Delay(Duration),
    /// Stand idle until a calendar date.
    Until(SimTime),
    /// Non-productive time booked against `process`.
    Idle { process: ProcessId, duration: Duration },
}

#[derive(Clone, PartialEq, Debug)]
pub struct PathElement {
    pub id:   ElementId,
    /// 1-based source line this element was generated from.
    pub line: usize,
    pub kind: ElementKind,
}

impl PathElement {
    /// Tasks worked by this element (empty for delays).
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        let steps: &[PathStep] = match &self.kind {
            ElementKind::Steps(steps) => steps,
            _ => &[],
        };
        steps.iter().flat_map(PathStep::tasks)
    }
}

// ── EquipmentPath ─────────────────────────────────────────────────────────────

/// The remaining path of one equipment, in work order.
#[derive(Clone, Debug, Default)]
pub struct EquipmentPath {
    elements: Vec<PathElement>,
    next_id:  u32,
}

impl EquipmentPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new element and return its id.
    pub fn push(&mut self, line: usize, kind: ElementKind) -> ElementId {
        let element = self.alloc(line, kind);
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Build an element with a fresh id without placing it in the path.
    pub fn alloc(&mut self, line: usize, kind: ElementKind) -> PathElement {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        PathElement { id, line, kind }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&PathElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Remove an element.  Removing an element that is already gone is a
    /// no-op returning `None`.
    pub fn remove(&mut self, id: ElementId) -> Option<PathElement> {
        let pos = self.position(id)?;
        Some(self.elements.remove(pos))
    }

    pub fn insert_first(&mut self, element: PathElement) {
        self.elements.insert(0, element);
    }

    /// Insert `element` directly after `anchor`.
    ///
    /// If `anchor` is no longer in the path the element is appended and
    /// `false` is returned.
    pub fn insert_after(&mut self, anchor: ElementId, element: PathElement) -> bool {
        match self.position(anchor) {
            Some(pos) => {
                self.elements.insert(pos + 1, element);
                true
            }
            None => {
                self.elements.push(element);
                false
            }
        }
    }

    /// Move the listed elements that are still present to the front, keeping
    /// their relative path order.  Returns how many were moved.
    pub fn move_to_front(&mut self, ids: &[ElementId]) -> usize {
        let (mut front, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|e| ids.contains(&e.id));
        let moved = front.len();
        front.extend(rest);
        self.elements = front;
        moved
    }
}
