//! `SyncRuntime` — applies interpreted directives and drives them through a run.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, trace};

use ps_constraint::ConstraintEngine;
use ps_core::{ElementId, EquipmentId, SimDuration, SimTime, SyncConfig, TaskId};
use ps_model::{Case, Dependency, ElementKind, Equipment, PathStep, ScheduleLibrary, StepRate, TaskGraph};

use crate::interpret::Interpreter;
use crate::walker::{EnableGate, PathWalker, WalkedLine};
use crate::{
    Action, DirectiveError, Effect, LineContext, LineOutcome, Registration, SetupSummary, SyncError,
    SyncObserver, SyncResult, Timeline,
};

// ── Watches ───────────────────────────────────────────────────────────────────

/// An action held until a task set has completed.
#[derive(Debug)]
struct CompletionWatch {
    waiting: BTreeSet<TaskId>,
    delay:   SimDuration,
    /// Taken when the watch fires.
    action:  Option<Action>,
}

/// An action held until its equipment selects, then releases, one of
/// `elements`.
#[derive(Debug)]
struct SelectionWatch {
    equipment: EquipmentId,
    elements:  Vec<ElementId>,
    armed:     bool,
    action:    Option<Action>,
}

// ── SyncRuntime ───────────────────────────────────────────────────────────────

/// Directive state for one scheduling run.
///
/// Setup: [`parse_path`](Self::parse_path) for each equipment, then
/// [`finish_setup`](Self::finish_setup).  During the run the scheduler
/// reports completions, selections, releases and the passage of time, and
/// asks [`is_available`](Self::is_available) before selecting a task.
///
/// Create via [`RuntimeBuilder`][crate::RuntimeBuilder].
pub struct SyncRuntime {
    pub(crate) config:   SyncConfig,
    pub(crate) case:     Case,
    pub(crate) library:  ScheduleLibrary,
    pub(crate) engine:   ConstraintEngine,
    pub(crate) timeline: Timeline,
    /// Latest instant the runtime has been advanced to.
    pub(crate) now:      SimTime,

    parsed:      BTreeSet<EquipmentId>,
    setup_done:  bool,
    completions: Vec<CompletionWatch>,
    /// Task → indices into `completions` still waiting on it.
    by_task:     BTreeMap<TaskId, Vec<usize>>,
    selections:  Vec<SelectionWatch>,
}

impl SyncRuntime {
    pub(crate) fn new(config: SyncConfig, case: Case, library: ScheduleLibrary) -> Self {
        Self {
            now: config.run_start,
            config,
            case,
            library,
            engine: ConstraintEngine::new(),
            timeline: Timeline::new(),
            parsed: BTreeSet::new(),
            setup_done: false,
            completions: Vec::new(),
            by_task: BTreeMap::new(),
            selections: Vec::new(),
        }
    }

    // ── Setup ─────────────────────────────────────────────────────────────

    /// Parse the directives in `equipment`'s source path and install them.
    ///
    /// The whole path is interpreted before anything is installed, so a
    /// failing line leaves no trace of the path's earlier lines.  Dependency
    /// edges are staged on a copy of the task graph as each directive is
    /// interpreted, so the directives after it already see them.  Parsing an
    /// equipment a second time is a no-op returning `Ok(false)`.
    pub fn parse_path<O: SyncObserver>(&mut self, equipment: EquipmentId, observer: &mut O) -> SyncResult<bool> {
        if self.parsed.contains(&equipment) {
            debug!("{equipment}: path already parsed");
            return Ok(false);
        }
        let outcome = self.interpret_path(equipment, observer)?;
        debug!(
            "{equipment}: {} registration(s), {} effect(s)",
            outcome.registrations.len(),
            outcome.effects.len()
        );
        self.commit(outcome)?;
        self.parsed.insert(equipment);
        Ok(true)
    }

    /// Parse every equipment in the case, then finish setup.
    pub fn parse_all<O: SyncObserver>(&mut self, observer: &mut O) -> SyncResult<SetupSummary> {
        let ids: Vec<EquipmentId> = self.case.equipment.iter().map(|e| e.id).collect();
        for id in ids {
            self.parse_path(id, observer)?;
        }
        Ok(self.finish_setup(observer))
    }

    /// Report setup totals.  The observer hears about it once.
    pub fn finish_setup<O: SyncObserver>(&mut self, observer: &mut O) -> SetupSummary {
        let summary = self.summary();
        if !self.setup_done {
            self.setup_done = true;
            info!(
                "directive setup: {} equipment, {} wait counter(s), {} time constraint(s), {} pending effect(s)",
                summary.equipment, summary.wait_counters, summary.time_constraints, summary.pending_effects
            );
            observer.on_setup_completed(&summary);
        }
        summary
    }

    fn interpret_path<O: SyncObserver>(&self, equipment: EquipmentId, observer: &mut O) -> SyncResult<LineOutcome> {
        let eq = self.case.equipment(equipment)?;
        let mut staged = self.case.tasks.clone();
        let mut gate = EnableGate::new(self.config.require_enable);
        let mut total = LineOutcome::default();

        for line in PathWalker::new(&eq.path_text, eq.path.elements()) {
            let directives = self
                .interpreter(eq, &staged)
                .directives(&line, &mut gate)
                .map_err(|source| line_error(eq, &line, source))?;
            let mut outcome = LineOutcome::default();
            for directive in &directives {
                let part = self
                    .interpreter(eq, &staged)
                    .interpret(&line, directive)
                    .map_err(|source| line_error(eq, &line, source))?;
                for effect in &part.effects {
                    if let Effect::Now(Action::AddDependencies { tasks, predecessors, delay, rule }) = effect {
                        add_dependencies(&mut staged, tasks, predecessors, *delay, rule)?;
                    }
                }
                outcome.extend(part);
            }
            observer.on_line_processed(&LineContext {
                equipment,
                name: &eq.name,
                line: line.number,
                text: line.text,
                comment: line.comment,
                elements: line.elements,
                directives: &directives,
                outcome: &outcome,
            });
            total.extend(outcome);
        }
        Ok(total)
    }

    fn interpreter<'a>(&'a self, equipment: &'a Equipment, tasks: &'a TaskGraph) -> Interpreter<'a> {
        Interpreter {
            config: &self.config,
            case: &self.case,
            tasks,
            library: &self.library,
            equipment,
        }
    }

    fn commit(&mut self, outcome: LineOutcome) -> SyncResult<()> {
        for registration in outcome.registrations {
            match registration {
                Registration::Wait { key, counter } => {
                    let done: Vec<(TaskId, SimTime)> = counter
                        .predecessors()
                        .iter()
                        .filter_map(|&p| Some((p, self.case.tasks.get(p).ok()?.completed_at?)))
                        .collect();
                    let handle = self.engine.add_wait(key, counter);
                    // Predecessors the host reported complete before setup.
                    for (p, at) in done {
                        self.engine.on_task_completed(p, at);
                    }
                    trace!("{key}: counter {handle:?}");
                }
                Registration::Window { key, window } => {
                    let (start, end) = (window.start, window.end);
                    let handle = self.engine.add_time_constraint(key, window);
                    self.timeline.push(start, Action::ActivateWindow(handle));
                    self.timeline.push(end, Action::DeactivateWindow(handle));
                }
            }
        }
        for effect in outcome.effects {
            self.schedule(effect)?;
        }
        Ok(())
    }

    fn schedule(&mut self, effect: Effect) -> SyncResult<()> {
        match effect {
            Effect::Now(action) => self.apply(action, self.now)?,
            Effect::At(at, action) => self.timeline.push(at, action),
            Effect::OnCompletion { tasks, delay, action } => {
                let waiting: BTreeSet<TaskId> =
                    tasks.iter().copied().filter(|&t| !self.case.tasks.is_complete(t)).collect();
                if waiting.is_empty() {
                    let last = tasks
                        .iter()
                        .filter_map(|&t| self.case.tasks.get(t).ok()?.completed_at)
                        .max()
                        .unwrap_or(self.now);
                    self.push_after(last, delay, action);
                } else {
                    let index = self.completions.len();
                    for &t in &waiting {
                        self.by_task.entry(t).or_default().push(index);
                    }
                    self.completions.push(CompletionWatch { waiting, delay, action: Some(action) });
                }
            }
            Effect::OnSelection { equipment, elements, action } => {
                self.selections.push(SelectionWatch { equipment, elements, armed: false, action: Some(action) });
            }
        }
        Ok(())
    }

    /// Queue `action` for `at + delay`.  An instant past the end of the
    /// calendar is never reached, so the action is dropped.
    fn push_after(&mut self, at: SimTime, delay: SimDuration, action: Action) {
        match at.checked_add_signed(delay) {
            Some(due) => self.timeline.push(due, action),
            None => debug!("{at}: {} falls beyond the calendar, dropped", action.label()),
        }
    }

    // ── Run notifications ─────────────────────────────────────────────────

    /// The scheduler completed `task` at `at`.
    ///
    /// Wait counters and completion watches see each task once; repeated
    /// reports are ignored.  Anything that becomes due at `at` is applied
    /// before this returns.
    pub fn task_completed(&mut self, task: TaskId, at: SimTime) -> SyncResult<()> {
        if !self.case.tasks.complete(task, at)? {
            trace!("{task}: already complete");
            return Ok(());
        }
        let counters = self.engine.on_task_completed(task, at);
        trace!("{task}: completed at {at}, {counters} counter(s) decremented");

        if let Some(indices) = self.by_task.remove(&task) {
            for i in indices {
                let watch = &mut self.completions[i];
                watch.waiting.remove(&task);
                if !watch.waiting.is_empty() {
                    continue;
                }
                let delay = watch.delay;
                if let Some(action) = watch.action.take() {
                    self.push_after(at, delay, action);
                }
            }
        }
        self.advance_to(at)
    }

    /// The scheduler selected `task` on `element` for `equipment`.
    pub fn task_selected(
        &mut self,
        equipment: EquipmentId,
        element:   ElementId,
        task:      TaskId,
        at:        SimTime,
    ) -> SyncResult<()> {
        self.case.equipment_mut(equipment)?.select(element, task);
        for watch in &mut self.selections {
            if watch.equipment == equipment && watch.action.is_some() && watch.elements.contains(&element) {
                trace!("{equipment}: selection watch armed at {at}");
                watch.armed = true;
            }
        }
        Ok(())
    }

    /// The scheduler released whatever `equipment` was working on.
    pub fn task_released(&mut self, equipment: EquipmentId, at: SimTime) -> SyncResult<()> {
        self.case.equipment_mut(equipment)?.release();
        let due: Vec<Action> = self
            .selections
            .iter_mut()
            .filter(|w| w.equipment == equipment && w.armed)
            .filter_map(|w| w.action.take())
            .collect();
        for action in due {
            self.apply(action, at)?;
        }
        Ok(())
    }

    /// Apply every dated action due at or before `at`, in date order.
    pub fn advance_to(&mut self, at: SimTime) -> SyncResult<()> {
        if !self.config.contains(at) {
            trace!("{at}: outside the run window");
        }
        while let Some((when, actions)) = self.timeline.pop_due(at) {
            for action in actions {
                self.apply(action, when)?;
            }
        }
        self.now = self.now.max(at);
        Ok(())
    }

    /// The availability predicate installed on the scheduler.
    pub fn is_available(&self, equipment: EquipmentId, task: TaskId, at: SimTime) -> bool {
        self.engine.is_available(equipment, task, at)
    }

    // ── Actions ───────────────────────────────────────────────────────────

    fn apply(&mut self, action: Action, at: SimTime) -> SyncResult<()> {
        debug!("{at}: {}", action.label());
        match action {
            Action::AddDependencies { tasks, predecessors, delay, rule } => {
                add_dependencies(&mut self.case.tasks, &tasks, &predecessors, delay, rule)?;
            }
            Action::RemoveDependencies { tasks, only } => {
                let mut removed = 0;
                for &task in &tasks {
                    removed += self.case.tasks.remove_dependencies(task, only.as_ref())?;
                }
                debug!("{at}: removed {removed} dependency edge(s)");
            }
            Action::RemoveElements { equipment, elements } => {
                let path = &mut self.case.equipment_mut(equipment)?.path;
                let removed = elements.iter().filter(|&&id| path.remove(id).is_some()).count();
                debug!("{at}: {equipment} removed {removed} of {} element(s)", elements.len());
            }
            Action::InsertIdle { equipment, line, process, duration } => {
                let path = &mut self.case.equipment_mut(equipment)?.path;
                let element = path.alloc(line, ElementKind::Idle { process, duration });
                path.insert_first(element);
            }
            Action::ForceComplete { equipment, line, steps, ignore_constraints } => {
                let open = self.open_steps(steps, ignore_constraints);
                if open.is_empty() {
                    debug!("{at}: {equipment} line {line} already complete, nothing to force");
                    return Ok(());
                }
                let path = &mut self.case.equipment_mut(equipment)?.path;
                let element = path.alloc(line, ElementKind::Steps(open));
                path.insert_first(element);
            }
            Action::MoveToFront { equipment, elements } => {
                let moved = self.case.equipment_mut(equipment)?.path.move_to_front(&elements);
                debug!("{at}: {equipment} moved {moved} element(s) to the front");
            }
            Action::InsertSteps { equipment, line, after, steps } => {
                let path = &mut self.case.equipment_mut(equipment)?.path;
                let mut cursor = after;
                for step in steps {
                    let element = path.alloc(line, ElementKind::Steps(vec![step]));
                    let id = element.id;
                    path.insert_after(cursor, element);
                    cursor = id;
                }
            }
            Action::ActivateWindow(handle) => self.engine.activate(handle)?,
            Action::DeactivateWindow(handle) => self.engine.deactivate(handle)?,
        }
        Ok(())
    }

    /// Instant-completion copies of the steps whose source is still open.
    fn open_steps(&self, steps: Vec<PathStep>, ignore_constraints: bool) -> Vec<PathStep> {
        steps
            .into_iter()
            .filter(|s| !self.case.tasks.is_complete(s.source))
            .map(|s| PathStep {
                quantity: None,
                duration: None,
                rate: StepRate::Instant,
                ignore_constraints,
                ..s
            })
            .collect()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn equipment(&self, id: EquipmentId) -> SyncResult<&Equipment> {
        Ok(self.case.equipment(id)?)
    }

    pub fn engine(&self) -> &ConstraintEngine {
        &self.engine
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn is_parsed(&self, equipment: EquipmentId) -> bool {
        self.parsed.contains(&equipment)
    }

    pub fn summary(&self) -> SetupSummary {
        SetupSummary {
            equipment:        self.parsed.len(),
            wait_counters:    self.engine.counter_count(),
            time_constraints: self.engine.window_count(),
            pending_effects:  self.timeline.len()
                + self.completions.iter().filter(|w| w.action.is_some()).count()
                + self.selections.iter().filter(|w| w.action.is_some()).count(),
        }
    }
}

fn add_dependencies(
    graph:        &mut TaskGraph,
    tasks:        &BTreeSet<TaskId>,
    predecessors: &BTreeSet<TaskId>,
    delay:        SimDuration,
    rule:         &str,
) -> SyncResult<()> {
    for &task in tasks {
        for &predecessor in predecessors {
            graph.add_dependency(task, Dependency { predecessor, delay, rule: rule.to_string() })?;
        }
    }
    Ok(())
}

fn line_error(equipment: &Equipment, line: &WalkedLine<'_>, source: DirectiveError) -> SyncError {
    SyncError::Line { equipment: equipment.name.clone(), line: line.number, source }
}
