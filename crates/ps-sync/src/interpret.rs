//! The directive interpreter: one path line in, a [`LineOutcome`] out.
//!
//! Pure with respect to the case and the constraint engine.  Everything it
//! decides is returned as data and applied by the runtime at commit.  Graph
//! queries go through [`Interpreter::tasks`], which the runtime stages so a
//! directive sees the edges added before it in the same path.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use ps_constraint::{EquipmentTaskKey, SourceLine, TimeConstraint, WaitCounter};
use ps_core::time::{fraction_inside, overlap};
use ps_core::{ElementId, RemoveTrigger, SimDuration, SimTime, SyncConfig, TaskId};
use ps_directive::{Directive, DirectiveKind, RemoveWhen, ResolveContext, tokenize};
use ps_model::{
    Case, ElementKind, Equipment, PathStep, ScheduleKind, ScheduleLibrary, StepRate, TaskGraph, TaskRole,
};

use crate::walker::{EnableGate, WalkedLine};
use crate::{Action, DirectiveError, Effect, LineOutcome, Registration};

/// Read-only view of everything directive handlers may consult.
#[derive(Copy, Clone)]
pub struct Interpreter<'a> {
    pub config:    &'a SyncConfig,
    pub case:      &'a Case,
    /// The dependency graph as of the line being interpreted.
    pub tasks:     &'a TaskGraph,
    pub library:   &'a ScheduleLibrary,
    pub equipment: &'a Equipment,
}

impl<'a> Interpreter<'a> {
    // ── Recognition ───────────────────────────────────────────────────────

    /// Tokenize `line`'s comment, drop unknown names, apply the gate, and
    /// resolve arguments.
    ///
    /// Non-gate directives on a line that compiled to no elements have
    /// nothing to act on and are skipped before the gate sees them.
    pub fn directives(
        &self,
        line: &WalkedLine<'_>,
        gate: &mut EnableGate,
    ) -> Result<Vec<Directive>, DirectiveError> {
        let Some(comment) = line.comment else {
            return Ok(Vec::new());
        };
        let ctx = ResolveContext { config: self.config, case: self.case };
        let mut out = Vec::new();
        for cmd in tokenize(comment) {
            let Some(kind) = DirectiveKind::from_name(&cmd.name) else {
                trace!("line {}: ignoring unknown directive !{}", line.number, cmd.name);
                continue;
            };
            if !kind.is_gate() && line.elements.is_empty() {
                debug!("line {}: !{} has no path elements to act on", line.number, kind.name());
                continue;
            }
            if !gate.admit(kind)? {
                continue;
            }
            let directive = Directive::resolve(kind, &cmd, ctx)
                .map_err(|source| DirectiveError::Argument { directive: kind.name(), source })?;
            out.push(directive);
        }
        Ok(out)
    }

    // ── Interpretation ────────────────────────────────────────────────────

    pub fn interpret(&self, line: &WalkedLine<'_>, directive: &Directive) -> Result<LineOutcome, DirectiveError> {
        let scope = LineScope::new(line);
        let origin = SourceLine {
            line:      line.number,
            text:      line.text.to_string(),
            directive: directive.kind().name(),
        };
        let equipment = self.equipment.id;
        let mut out = LineOutcome::default();

        match directive {
            Directive::Enable | Directive::Disable => {}

            Directive::WaitFree { delay } => {
                let preds = self.tasks.external_predecessors(&scope.tasks);
                self.wait(&scope, preds, *delay, origin, &mut out);
            }

            Directive::WaitOn { predecessors, delay } => {
                let preds = predecessors.difference(&scope.tasks).copied().collect();
                self.wait(&scope, preds, *delay, origin, &mut out);
            }

            Directive::DependFree { delay } => {
                let preds = self.tasks.external_predecessors(&scope.tasks);
                depend(&scope, preds, *delay, "dependfree", &mut out);
            }

            Directive::DependOn { predecessors, delay } => {
                let preds = predecessors.difference(&scope.tasks).copied().collect();
                depend(&scope, preds, *delay, "dependon", &mut out);
            }

            Directive::DependClear { at, only } => {
                if scope.tasks.is_empty() {
                    debug!("line {}: !dependclear on a line with no tasks", line.number);
                } else {
                    out.effects.push(Effect::At(*at, Action::RemoveDependencies {
                        tasks: scope.tasks.clone(),
                        only:  only.clone(),
                    }));
                }
            }

            Directive::Deadhead { duration, process } => {
                let process = process
                    .or(self.equipment.inactive_process)
                    .ok_or(DirectiveError::NoIdleProcess)?;
                if scope.tasks.is_empty() {
                    warn!("line {}: !deadhead on a line with no tasks never fires", line.number);
                } else {
                    out.effects.push(Effect::OnCompletion {
                        tasks:  scope.tasks.clone(),
                        delay:  SimDuration::zero(),
                        action: Action::InsertIdle { equipment, line: line.number, process, duration: *duration },
                    });
                }
            }

            Directive::TimeConstrain { start, end, mode } => {
                for &task in &scope.tasks {
                    out.registrations.push(Registration::Window {
                        key:    EquipmentTaskKey::new(equipment, task),
                        window: TimeConstraint::new(*mode, *start, *end, origin.clone()),
                    });
                }
            }

            Directive::Remove { when, delay } => {
                let action = Action::RemoveElements { equipment, elements: scope.element_ids.clone() };
                if let Some(effect) = self.remove_trigger(when, *delay, action) {
                    out.effects.push(effect);
                } else {
                    debug!("line {}: !remove never triggers", line.number);
                }
            }

            Directive::ForceComplete { at, ignore_constraints } => {
                if *at > self.config.run_end {
                    debug!("line {}: !forcecomplete at {at} is past the run end, skipped", line.number);
                } else if scope.steps.is_empty() {
                    debug!("line {}: !forcecomplete on a line with no steps", line.number);
                } else {
                    out.effects.push(Effect::At(*at, Action::ForceComplete {
                        equipment,
                        line: line.number,
                        steps: scope.steps.clone(),
                        ignore_constraints: *ignore_constraints,
                    }));
                }
            }

            Directive::Reprioritise => {
                out.effects.push(Effect::OnSelection {
                    equipment,
                    elements: scope.element_ids.clone(),
                    action:   Action::MoveToFront { equipment, elements: scope.element_ids.clone() },
                });
            }

            Directive::InjectSchedulePath { case, equipment: from, start, end, kind } => {
                let steps = self.scheduled_steps(case, from, *start, *end, *kind)?;
                match scope.element_ids.last() {
                    Some(&after) if !steps.is_empty() => {
                        out.effects.push(Effect::Now(Action::InsertSteps {
                            equipment,
                            line: line.number,
                            after,
                            steps,
                        }));
                    }
                    _ => debug!("line {}: nothing to inject from `{case}`/{from}", line.number),
                }
            }
        }
        Ok(out)
    }

    // ── Handlers ──────────────────────────────────────────────────────────

    /// One counter per line task, each over the same predecessor set.
    fn wait(
        &self,
        scope:  &LineScope,
        preds:  BTreeSet<TaskId>,
        delay:  SimDuration,
        origin: SourceLine,
        out:    &mut LineOutcome,
    ) {
        if preds.is_empty() {
            debug!("line {}: !{} has no predecessors to wait on", origin.line, origin.directive);
            return;
        }
        for &task in &scope.tasks {
            out.registrations.push(Registration::Wait {
                key:     EquipmentTaskKey::new(self.equipment.id, task),
                counter: WaitCounter::new(preds.clone(), delay, origin.clone()),
            });
        }
    }

    /// `None` when the trigger matches no tasks or falls beyond the calendar.
    fn remove_trigger(&self, when: &RemoveWhen, delay: SimDuration, action: Action) -> Option<Effect> {
        match when {
            RemoveWhen::At(at) => at.checked_add_signed(delay).map(|due| Effect::At(due, action)),
            RemoveWhen::Tasks { tasks, .. } if tasks.is_empty() => None,
            RemoveWhen::Tasks { tasks, on: RemoveTrigger::Completed } => {
                Some(Effect::OnCompletion { tasks: tasks.clone(), delay, action })
            }
            RemoveWhen::Tasks { tasks, on: RemoveTrigger::Available } => {
                let preds: BTreeSet<TaskId> =
                    tasks.iter().flat_map(|&t| self.tasks.direct_predecessors(t)).collect();
                if preds.is_empty() {
                    let due = self.config.run_start.checked_add_signed(delay)?;
                    Some(Effect::At(due, action))
                } else {
                    Some(Effect::OnCompletion { tasks: preds, delay, action })
                }
            }
        }
    }

    /// Steps of `from` in another case's schedule that overlap the window,
    /// prorated to the part inside it and mapped onto this case's tasks.
    fn scheduled_steps(
        &self,
        case:  &str,
        from:  &str,
        start: SimTime,
        end:   SimTime,
        kind:  ScheduleKind,
    ) -> Result<Vec<PathStep>, DirectiveError> {
        let schedule = self
            .library
            .steps(case, kind)
            .ok_or_else(|| DirectiveError::NoSchedule { case: case.to_string(), kind })?;

        let mut steps = Vec::new();
        for s in schedule.iter().filter(|s| s.equipment.eq_ignore_ascii_case(from.trim())) {
            let fraction = fraction_inside(s.start, s.end, start, end);
            if fraction <= 0.0 {
                continue;
            }
            let Some(source) = self.case.find_task(&s.source, TaskRole::Source) else {
                warn!("injectschedulepath: no source task `{}` in case `{}`", s.source, self.case.name);
                continue;
            };
            let destination = match &s.destination {
                None => None,
                Some(name) => match self.case.find_task(name, TaskRole::Destination) {
                    Some(id) => Some(id),
                    None => {
                        warn!("injectschedulepath: no destination `{name}` in case `{}`", self.case.name);
                        continue;
                    }
                },
            };
            steps.push(PathStep {
                source,
                destination,
                quantity:           Some(s.quantity * fraction),
                duration:           Some(overlap(s.start, s.end, start, end)),
                rate:               StepRate::Planned,
                ignore_constraints: false,
            });
        }
        Ok(steps)
    }
}

fn depend(scope: &LineScope, preds: BTreeSet<TaskId>, delay: SimDuration, rule: &'static str, out: &mut LineOutcome) {
    if preds.is_empty() || scope.tasks.is_empty() {
        return;
    }
    out.effects.push(Effect::Now(Action::AddDependencies {
        tasks: scope.tasks.clone(),
        predecessors: preds,
        delay,
        rule,
    }));
}

// ── LineScope ─────────────────────────────────────────────────────────────────

/// What a line's elements amount to.
struct LineScope {
    element_ids: Vec<ElementId>,
    tasks:       BTreeSet<TaskId>,
    steps:       Vec<PathStep>,
}

impl LineScope {
    fn new(line: &WalkedLine<'_>) -> Self {
        let steps = line
            .elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Steps(steps) => Some(steps.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect();
        Self {
            element_ids: line.elements.iter().map(|e| e.id).collect(),
            tasks: line.elements.iter().flat_map(|e| e.tasks()).collect(),
            steps,
        }
    }
}
