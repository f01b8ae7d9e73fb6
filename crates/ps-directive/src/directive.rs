//! Typed directives.
//!
//! [`DirectiveKind`] maps a command word (with its aliases) to a closed set of
//! kinds; [`Directive::resolve`] turns a command of a known kind into a
//! [`Directive`] carrying parsed, case-resolved arguments.

use std::collections::BTreeSet;

use ps_core::{ProcessId, RemoveTrigger, SimDuration, SimTime, SyncConfig, TaskId, TimeMode};
use ps_model::{Case, ScheduleKind};

use crate::args::{self, Flag};
use crate::{ArgumentError, ArgumentResult, Command};

// ── DirectiveKind ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DirectiveKind {
    Enable,
    Disable,
    WaitFree,
    WaitOn,
    DependFree,
    DependOn,
    DependClear,
    Deadhead,
    TimeConstrain,
    Remove,
    ForceComplete,
    Reprioritise,
    InjectSchedulePath,
}

impl DirectiveKind {
    const NAMES: &'static [(DirectiveKind, &'static [&'static str])] = &[
        (Self::Enable, &["enable", "enabledirectives"]),
        (Self::Disable, &["disable", "disabledirectives"]),
        (Self::WaitFree, &["waitfree"]),
        (Self::WaitOn, &["waiton"]),
        (Self::DependFree, &["dependfree"]),
        (Self::DependOn, &["dependon"]),
        (Self::DependClear, &["dependclear"]),
        (Self::Deadhead, &["deadhead", "delayafter"]),
        (Self::TimeConstrain, &["timeconstrain", "timeconstraint"]),
        (Self::Remove, &["remove"]),
        (Self::ForceComplete, &["forcecomplete", "forcecompletion"]),
        (Self::Reprioritise, &["reprioritise", "reprioritize"]),
        (Self::InjectSchedulePath, &["injectschedulepath"]),
    ];

    /// Case-insensitive lookup.  `None` for names this engine does not know,
    /// which callers skip silently.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
            .map(|&(kind, _)| kind)
    }

    /// Canonical command word.
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("?", |(_, names)| names[0])
    }

    /// `true` for the directives that open or close the enable gate.
    pub fn is_gate(self) -> bool {
        matches!(self, Self::Enable | Self::Disable)
    }
}

// ── Directive ─────────────────────────────────────────────────────────────────

/// What triggers a deferred `remove`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RemoveWhen {
    At(SimTime),
    Tasks { tasks: BTreeSet<TaskId>, on: RemoveTrigger },
}

/// A directive with resolved arguments.
#[derive(Clone, PartialEq, Debug)]
pub enum Directive {
    Enable,
    Disable,
    /// Wait for every outside predecessor of the line's tasks.
    WaitFree { delay: SimDuration },
    /// Wait for an explicit task set.
    WaitOn { predecessors: BTreeSet<TaskId>, delay: SimDuration },
    /// Make every line task depend on every outside predecessor of the line.
    DependFree { delay: SimDuration },
    /// Make every line task depend on an explicit task set.
    DependOn { predecessors: BTreeSet<TaskId>, delay: SimDuration },
    /// At `at`, drop predecessor edges of the line's tasks, optionally only
    /// those whose predecessor is in `only`.
    DependClear { at: SimTime, only: Option<BTreeSet<TaskId>> },
    /// Book idle time once the line's tasks are all complete.
    Deadhead { duration: SimDuration, process: Option<ProcessId> },
    TimeConstrain { start: SimTime, end: SimTime, mode: TimeMode },
    Remove { when: RemoveWhen, delay: SimDuration },
    ForceComplete { at: SimTime, ignore_constraints: bool },
    Reprioritise,
    InjectSchedulePath {
        case:      String,
        equipment: String,
        start:     SimTime,
        end:       SimTime,
        kind:      ScheduleKind,
    },
}

/// What argument resolution may consult.
#[derive(Copy, Clone)]
pub struct ResolveContext<'a> {
    pub config: &'a SyncConfig,
    pub case:   &'a Case,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Self::Enable => DirectiveKind::Enable,
            Self::Disable => DirectiveKind::Disable,
            Self::WaitFree { .. } => DirectiveKind::WaitFree,
            Self::WaitOn { .. } => DirectiveKind::WaitOn,
            Self::DependFree { .. } => DirectiveKind::DependFree,
            Self::DependOn { .. } => DirectiveKind::DependOn,
            Self::DependClear { .. } => DirectiveKind::DependClear,
            Self::Deadhead { .. } => DirectiveKind::Deadhead,
            Self::TimeConstrain { .. } => DirectiveKind::TimeConstrain,
            Self::Remove { .. } => DirectiveKind::Remove,
            Self::ForceComplete { .. } => DirectiveKind::ForceComplete,
            Self::Reprioritise => DirectiveKind::Reprioritise,
            Self::InjectSchedulePath { .. } => DirectiveKind::InjectSchedulePath,
        }
    }

    /// Resolve the arguments of `cmd`, already identified as `kind`.
    pub fn resolve(kind: DirectiveKind, cmd: &Command, ctx: ResolveContext<'_>) -> ArgumentResult<Self> {
        let cfg = ctx.config;
        let release = || args::duration_or("delay", cmd.arg("delay"), cfg.default_release_delay, cfg.run_end);

        Ok(match kind {
            DirectiveKind::Enable => Self::Enable,
            DirectiveKind::Disable => Self::Disable,
            DirectiveKind::WaitFree => Self::WaitFree { delay: release()? },
            DirectiveKind::WaitOn => Self::WaitOn {
                predecessors: required_tasks(cmd, ctx.case)?,
                delay:        release()?,
            },
            DirectiveKind::DependFree => Self::DependFree { delay: release()? },
            DirectiveKind::DependOn => Self::DependOn {
                predecessors: required_tasks(cmd, ctx.case)?,
                delay:        release()?,
            },
            DirectiveKind::DependClear => Self::DependClear {
                at:   args::date_or("date", cmd.arg("date"), cfg.run_start)?,
                only: cmd
                    .arg_or_positional("tasks")
                    .map(|v| args::tasks("tasks", v, ctx.case))
                    .transpose()?,
            },
            DirectiveKind::Deadhead => Self::Deadhead {
                duration: args::duration(
                    "duration",
                    args::required("duration", cmd.arg_or_positional("duration"))?,
                    cfg.run_end,
                )?,
                process:  cmd
                    .arg("process")
                    .map(|p| {
                        ctx.case
                            .process_by_name(p)
                            .map_err(|source| ArgumentError::Lookup { arg: "process", source })
                    })
                    .transpose()?,
            },
            DirectiveKind::TimeConstrain => {
                let start = args::date_or("start", cmd.arg("start"), cfg.run_start)?;
                let end = args::date_or("end", cmd.arg("end"), cfg.run_end)?;
                if end <= start {
                    return Err(ArgumentError::EmptyWindow { start, end });
                }
                Self::TimeConstrain {
                    start,
                    end,
                    mode: args::alias_or("mode", cmd.arg("mode"), cfg.default_time_mode)?,
                }
            }
            DirectiveKind::Remove => Self::Remove {
                when:  remove_when(cmd, ctx)?,
                delay: args::duration_or("delay", cmd.arg("delay"), SimDuration::zero(), cfg.run_end)?,
            },
            DirectiveKind::ForceComplete => Self::ForceComplete {
                at:                 args::date_or("date", cmd.arg_or_positional("date"), cfg.run_start)?,
                ignore_constraints: args::alias_or("ignore", cmd.arg("ignore"), Flag(false))?.0,
            },
            DirectiveKind::Reprioritise => Self::Reprioritise,
            DirectiveKind::InjectSchedulePath => {
                let start = args::date_or("start", cmd.arg("start"), cfg.run_start)?;
                let end = args::date_or("end", cmd.arg("end"), cfg.run_end)?;
                if end <= start {
                    return Err(ArgumentError::EmptyWindow { start, end });
                }
                Self::InjectSchedulePath {
                    case:      args::required("case", cmd.arg("case"))?.to_string(),
                    equipment: args::required("equipment", cmd.arg_or_positional("equipment"))?.to_string(),
                    start,
                    end,
                    kind:      args::alias_or("from", cmd.arg("from"), ScheduleKind::Output)?,
                }
            }
        })
    }
}

fn required_tasks(cmd: &Command, case: &Case) -> ArgumentResult<BTreeSet<TaskId>> {
    let value = args::required("tasks", cmd.arg_or_positional("tasks"))?;
    args::tasks("tasks", value, case)
}

fn remove_when(cmd: &Command, ctx: ResolveContext<'_>) -> ArgumentResult<RemoveWhen> {
    let date = cmd.arg("date");
    let tasks = cmd.arg_or_positional("tasks");
    match (date, tasks) {
        (Some(_), Some(_)) => Err(ArgumentError::Conflict { first: "date", second: "tasks" }),
        (Some(d), None) => Ok(RemoveWhen::At(args::date("date", d)?)),
        (None, Some(t)) => Ok(RemoveWhen::Tasks {
            tasks: args::tasks("tasks", t, ctx.case)?,
            on:    args::alias_or("on", cmd.arg("on"), ctx.config.default_remove_trigger)?,
        }),
        (None, None) => Err(ArgumentError::Missing { arg: "date|tasks" }),
    }
}
