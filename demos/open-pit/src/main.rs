//! open-pit — a drill and a loader sharing three blocks, synchronised by
//! path directives.
//!
//! A toy hourly scheduler stands in for the real engine: each machine works
//! its path front to back, asks the runtime whether the next task is
//! available, and reports completions, selections and releases.  Run with
//! `RUST_LOG=debug` to watch directives being installed and fired.

use std::collections::{BTreeMap, HashSet};
use std::io::Cursor;

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use log::info;

use ps_core::{ElementId, EquipmentId, SimTime, SyncConfig, TaskId};
use ps_model::{
    Case, Dependency, ElementKind, PathStep, ScheduleKind, ScheduleLibrary, StepRate, TaskRole,
    load_schedule_reader,
};
use ps_sync::{LineContext, RuntimeBuilder, SetupSummary, SyncObserver, SyncRuntime};

// ── Constants ─────────────────────────────────────────────────────────────────

const DRILL_HOURS: i64 = 4;
const LOAD_HOURS:  i64 = 3;
const RUN_DAYS:    i64 = 3;

const DRILL_PATH: &str = "\
'!enable
A/1/1 <Drill>    '!deadhead 2h process=Standby
A/1/2 <Drill>
A/2/1 <Drill>    '!timeconstrain start=2024-01-01 08:00 end=2024-01-01 20:00
";

const LOADER_PATH: &str = "\
'!enable
A/1/1 <Load>; d:Crusher    '!waiton A/1/1 <Drill> delay=1h
A/1/2 <Load>; d:Crusher    '!waiton A/1/2 <Drill> !injectschedulepath EX09 case=last-week start=2024-01-01 end=2024-01-02
A/2/1 <Load>; d:Crusher    '!waitfree !reprioritise
";

// Last week's computed schedule for a loader that has since left the pit.
const LAST_WEEK_CSV: &str = "\
equipment,source,destination,start,end,quantity\n\
EX09,SP/1,Crusher,2024-01-01 18:00,2024-01-02 02:00,400\n\
EX09,A/1/2,Crusher,2023-12-28 06:00,2023-12-28 09:00,120\n\
";

// ── Audit observer ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Audit {
    directives: BTreeMap<&'static str, usize>,
}

impl SyncObserver for Audit {
    fn on_line_processed(&mut self, ctx: &LineContext<'_>) {
        for d in ctx.directives {
            *self.directives.entry(d.kind().name()).or_default() += 1;
        }
    }

    fn on_setup_completed(&mut self, summary: &SetupSummary) {
        println!(
            "Setup: {} equipment, {} wait counter(s), {} time constraint(s), {} pending effect(s)",
            summary.equipment, summary.wait_counters, summary.time_constraints, summary.pending_effects
        );
    }
}

// ── Toy scheduler ─────────────────────────────────────────────────────────────

enum Work {
    Step { element: ElementId, step: PathStep },
    Idle { element: ElementId, duration: Duration },
    Until { element: ElementId, at: SimTime },
}

#[derive(Default)]
struct Machine {
    busy: Option<(SimTime, ElementId, Option<TaskId>)>,
    done: HashSet<ElementId>,
}

/// First thing on `eq`'s path that still needs doing, if it may start now.
fn next_work(rt: &SyncRuntime, eq: EquipmentId, machine: &mut Machine, now: SimTime) -> Result<Option<Work>> {
    let case = rt.case();
    for element in rt.equipment(eq)?.path.elements() {
        if machine.done.contains(&element.id) {
            continue;
        }
        let id = element.id;
        match &element.kind {
            ElementKind::Steps(steps) => {
                let Some(step) = steps.iter().find(|s| !case.tasks.is_complete(s.source)) else {
                    machine.done.insert(id);
                    continue;
                };
                let ready = step.ignore_constraints
                    || (rt.is_available(eq, step.source, now) && case.tasks.dependencies_satisfied(step.source, now));
                return Ok(ready.then(|| Work::Step { element: id, step: step.clone() }));
            }
            ElementKind::Delay(d) | ElementKind::Idle { duration: d, .. } => {
                return Ok(Some(Work::Idle { element: id, duration: *d }));
            }
            ElementKind::Until(at) => return Ok(Some(Work::Until { element: id, at: *at })),
        }
    }
    Ok(None)
}

fn step_hours(rt: &SyncRuntime, step: &PathStep) -> Duration {
    if let Some(d) = step.duration {
        return d;
    }
    if step.rate == StepRate::Instant {
        return Duration::zero();
    }
    let process = rt.case().tasks.get(step.source).map(|t| t.process).ok();
    match process.and_then(|p| rt.case().process_name(p)) {
        Some("Drill") => Duration::hours(DRILL_HOURS),
        _ => Duration::hours(LOAD_HOURS),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    println!("=== open-pit — path directive demo ===");

    // 1. Case: three blocks, drilled then loaded to the crusher.
    let mut case = Case::new("this-week");
    let drill = case.add_process("Drill", true);
    let load = case.add_process("Load", true);
    let haul = case.add_process("Haul", true);
    let standby = case.add_process("Standby", false);
    for name in ["A/1/1", "A/1/2", "A/2/1"] {
        let d = case.tasks.add_task(name, TaskRole::Source, drill, 800.0);
        let l = case.tasks.add_task(name, TaskRole::Source, load, 12_000.0);
        case.tasks.add_dependency(l, Dependency { predecessor: d, delay: Duration::zero(), rule: "block".into() })?;
    }
    // Stockpile rehandle, only ever worked through injected schedule steps.
    case.tasks.add_task("SP/1", TaskRole::Source, load, 5_000.0);
    case.tasks.add_task("Crusher", TaskRole::Destination, haul, 0.0);
    let drill_rig = case.add_equipment("DR01", DRILL_PATH);
    let loader = case.add_equipment("EX01", LOADER_PATH);
    case.equipment[loader.index()].inactive_process = Some(standby);

    // 2. Library: last week's output schedule.
    let mut library = ScheduleLibrary::new();
    library.insert("last-week", ScheduleKind::Output, load_schedule_reader(Cursor::new(LAST_WEEK_CSV))?);

    // 3. Runtime.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("invalid run start"))?;
    let config = SyncConfig::new(start, start + Duration::days(RUN_DAYS));
    let mut rt = RuntimeBuilder::new(config, case).library(library).build()?;

    let mut audit = Audit::default();
    rt.parse_all(&mut audit)?;
    for (name, count) in &audit.directives {
        println!("  !{name:<20} x{count}");
    }
    println!();

    // 4. Hourly loop.
    let machines = [drill_rig, loader];
    let mut state: BTreeMap<EquipmentId, Machine> = machines.iter().map(|&m| (m, Machine::default())).collect();
    let mut now = start;
    let end = rt.config().run_end;
    while now < end {
        rt.advance_to(now)?;
        for &eq in &machines {
            let machine = state.entry(eq).or_default();
            if let Some((until, element, task)) = machine.busy {
                if until > now {
                    continue;
                }
                machine.busy = None;
                if let Some(task) = task {
                    rt.task_completed(task, until)?;
                    rt.task_released(eq, until)?;
                } else {
                    machine.done.insert(element);
                }
            }
            match next_work(&rt, eq, machine, now)? {
                Some(Work::Step { element, step }) => {
                    rt.task_selected(eq, element, step.source, now)?;
                    let until = now + step_hours(&rt, &step);
                    info!("{now}: {eq} starts {} until {until}", step.source);
                    machine.busy = Some((until, element, Some(step.source)));
                }
                Some(Work::Idle { element, duration }) => machine.busy = Some((now + duration, element, None)),
                Some(Work::Until { element, at }) if at <= now => {
                    machine.done.insert(element);
                }
                Some(Work::Until { .. }) | None => {}
            }
        }
        now += Duration::hours(1);
    }

    // 5. Summary.
    println!("{:<8} {:<8} {:<20}", "Block", "Process", "Completed");
    println!("{}", "-".repeat(38));
    for task in rt.case().tasks.iter().filter(|t| t.role == TaskRole::Source) {
        let process = rt.case().process_name(task.process).unwrap_or("?");
        let completed = task.completed_at.map_or("-".to_string(), |t| t.to_string());
        println!("{:<8} {:<8} {:<20}", task.name, process, completed);
    }
    for &eq in &machines {
        let e = rt.equipment(eq)?;
        println!("{}: {} element(s) left on path", e.name, e.path.len());
    }

    Ok(())
}
