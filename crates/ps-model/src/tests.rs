//! Unit tests for ps-model.

use std::collections::BTreeSet;
use std::io::Cursor;

use chrono::{Duration, NaiveDate};

use ps_core::{ElementId, ProcessId, SimTime, TaskId};

use crate::{
    Case, Dependency, ElementKind, EquipmentPath, ModelError, PathStep, RangeError,
    ScheduleKind, ScheduleLibrary, TaskRange, TaskRole, compile_path, load_schedule_reader,
    split_comment,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn day(d: u32) -> SimTime {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

/// Two benches of two blocks each, drilled then loaded, plus a crusher.
///
/// Task ids: 0 A/1/1 Drill, 1 A/1/1 Load, 2 A/1/2 Drill, 3 A/1/2 Load,
/// 4 A/2/1 Drill, 5 A/2/1 Load, 6 Crusher (destination).
fn pit() -> Case {
    let mut case = Case::new("base");
    let drill = case.add_process("Drill", true);
    let load = case.add_process("Load", true);
    let haul = case.add_process("Haul", true);
    for name in ["A/1/1", "A/1/2", "A/2/1"] {
        case.tasks.add_task(name, TaskRole::Source, drill, 100.0);
        case.tasks.add_task(name, TaskRole::Source, load, 1_000.0);
    }
    case.tasks.add_task("Crusher", TaskRole::Destination, haul, 0.0);
    case
}

fn ids(v: &[u32]) -> BTreeSet<TaskId> {
    v.iter().map(|&i| TaskId(i)).collect()
}

fn dep(pred: u32, hours: i64) -> Dependency {
    Dependency { predecessor: TaskId(pred), delay: Duration::hours(hours), rule: "test".into() }
}

// ── TaskGraph ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_graph {
    use super::*;

    #[test]
    fn add_dependency_keeps_one_edge_per_predecessor() {
        let mut case = pit();
        assert!(case.tasks.add_dependency(TaskId(1), dep(0, 0)).unwrap());
        assert!(!case.tasks.add_dependency(TaskId(1), dep(0, 4)).unwrap());
        let t = case.tasks.get(TaskId(1)).unwrap();
        assert_eq!(t.predecessors.len(), 1);
        assert_eq!(t.predecessors[0].delay, Duration::hours(4));
    }

    #[test]
    fn self_edges_ignored() {
        let mut case = pit();
        assert!(!case.tasks.add_dependency(TaskId(1), dep(1, 0)).unwrap());
        assert!(case.tasks.get(TaskId(1)).unwrap().predecessors.is_empty());
    }

    #[test]
    fn unknown_predecessor_is_an_error() {
        let mut case = pit();
        let err = case.tasks.add_dependency(TaskId(1), dep(99, 0)).unwrap_err();
        assert!(matches!(err, ModelError::UnknownTask(TaskId(99))));
    }

    #[test]
    fn remove_dependencies_with_filter() {
        let mut case = pit();
        case.tasks.add_dependency(TaskId(3), dep(0, 0)).unwrap();
        case.tasks.add_dependency(TaskId(3), dep(2, 0)).unwrap();
        assert_eq!(case.tasks.remove_dependencies(TaskId(3), Some(&ids(&[2]))).unwrap(), 1);
        assert_eq!(case.tasks.direct_predecessors(TaskId(3)).collect::<Vec<_>>(), vec![TaskId(0)]);
        assert_eq!(case.tasks.remove_dependencies(TaskId(3), None).unwrap(), 1);
        assert_eq!(case.tasks.remove_dependencies(TaskId(3), None).unwrap(), 0);
    }

    #[test]
    fn external_predecessors_exclude_members() {
        let mut case = pit();
        case.tasks.add_dependency(TaskId(1), dep(0, 0)).unwrap();
        case.tasks.add_dependency(TaskId(3), dep(2, 0)).unwrap();
        case.tasks.add_dependency(TaskId(3), dep(1, 0)).unwrap();
        let external = case.tasks.external_predecessors(&ids(&[1, 3]));
        assert_eq!(external, ids(&[0, 2]));
    }

    #[test]
    fn completion_fires_once() {
        let mut case = pit();
        assert!(case.tasks.complete(TaskId(0), day(2)).unwrap());
        assert!(!case.tasks.complete(TaskId(0), day(5)).unwrap());
        assert_eq!(case.tasks.get(TaskId(0)).unwrap().completed_at, Some(day(2)));
    }

    #[test]
    fn dependencies_satisfied_honours_delay() {
        let mut case = pit();
        case.tasks.add_dependency(TaskId(1), dep(0, 24)).unwrap();
        assert!(!case.tasks.dependencies_satisfied(TaskId(1), day(9)));
        case.tasks.complete(TaskId(0), day(2)).unwrap();
        assert!(!case.tasks.dependencies_satisfied(TaskId(1), day(2)));
        assert!(case.tasks.dependencies_satisfied(TaskId(1), day(3)));
    }

    #[test]
    fn edge_delay_past_the_calendar_is_never_satisfied() {
        let mut case = pit();
        let edge = Dependency { predecessor: TaskId(0), delay: Duration::weeks(99_999_999), rule: "test".into() };
        case.tasks.add_dependency(TaskId(1), edge).unwrap();
        case.tasks.complete(TaskId(0), day(2)).unwrap();
        assert!(!case.tasks.dependencies_satisfied(TaskId(1), day(30)));
    }
}

// ── EquipmentPath ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod equipment_path {
    use super::*;

    fn three() -> EquipmentPath {
        let mut path = EquipmentPath::new();
        path.push(1, ElementKind::Delay(Duration::hours(1)));
        path.push(2, ElementKind::Delay(Duration::hours(2)));
        path.push(3, ElementKind::Delay(Duration::hours(3)));
        path
    }

    fn order(path: &EquipmentPath) -> Vec<u32> {
        path.elements().iter().map(|e| e.id.0).collect()
    }

    #[test]
    fn remove_is_idempotent() {
        let mut path = three();
        assert!(path.remove(ElementId(1)).is_some());
        assert!(path.remove(ElementId(1)).is_none());
        assert_eq!(order(&path), vec![0, 2]);
    }

    #[test]
    fn alloc_never_reuses_ids() {
        let mut path = three();
        path.remove(ElementId(2));
        let fresh = path.alloc(9, ElementKind::Delay(Duration::zero()));
        assert_eq!(fresh.id, ElementId(3));
    }

    #[test]
    fn insert_after_missing_anchor_appends() {
        let mut path = three();
        let a = path.alloc(4, ElementKind::Delay(Duration::zero()));
        assert!(path.insert_after(ElementId(0), a));
        let b = path.alloc(4, ElementKind::Delay(Duration::zero()));
        assert!(!path.insert_after(ElementId(42), b));
        assert_eq!(order(&path), vec![0, 3, 1, 2, 4]);
    }

    #[test]
    fn move_to_front_keeps_relative_order() {
        let mut path = three();
        assert_eq!(path.move_to_front(&[ElementId(2), ElementId(1), ElementId(7)]), 2);
        assert_eq!(order(&path), vec![1, 2, 0]);
    }

    #[test]
    fn element_tasks_cover_both_sides() {
        let mut path = EquipmentPath::new();
        let id = path.push(1, ElementKind::Steps(vec![PathStep::planned(TaskId(1), Some(TaskId(6)))]));
        let tasks: Vec<_> = path.get(id).unwrap().tasks().collect();
        assert_eq!(tasks, vec![TaskId(1), TaskId(6)]);
    }
}

// ── Task ranges ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_range {
    use super::*;

    fn resolve(text: &str) -> BTreeSet<TaskId> {
        TaskRange::parse(text).unwrap().resolve(&pit()).unwrap()
    }

    #[test]
    fn plain_name_matches_every_process() {
        assert_eq!(resolve("A/1/1"), ids(&[0, 1]));
        assert_eq!(resolve("a/1/1"), ids(&[0, 1]));
    }

    #[test]
    fn process_filter_narrows() {
        assert_eq!(resolve("A/1/1 <Drill>"), ids(&[0]));
        assert_eq!(resolve("A/1/1 <drill, load>"), ids(&[0, 1]));
        assert_eq!(resolve("A/1/1 <*>"), ids(&[0, 1]));
    }

    #[test]
    fn braces_expand_to_cartesian_product() {
        assert_eq!(resolve("A/{1,2}/1 <Load>"), ids(&[1, 5]));
        assert_eq!(resolve("A/1/{1,2} <Drill>"), ids(&[0, 2]));
    }

    #[test]
    fn role_prefixes() {
        assert_eq!(resolve("d:Crusher"), ids(&[6]));
        assert_eq!(resolve("s:Crusher"), ids(&[]));
        assert_eq!(resolve("S:A/2/1 <Load>"), ids(&[5]));
    }

    #[test]
    fn wildcards_and_multiple_terms() {
        assert_eq!(resolve("A/1/* <Drill>"), ids(&[0, 2]));
        assert_eq!(resolve("A/2/1 <Drill>; d:*"), ids(&[4, 6]));
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(TaskRange::parse("  "), Err(RangeError::Empty));
        assert!(matches!(TaskRange::parse("A/{1,2/1"), Err(RangeError::UnbalancedBrace(_))));
        assert!(matches!(TaskRange::parse("A/1}/1"), Err(RangeError::UnbalancedBrace(_))));
        assert!(matches!(TaskRange::parse("A/1/1 <Drill"), Err(RangeError::UnclosedFilter(_))));
        assert!(matches!(TaskRange::parse("<Drill>"), Err(RangeError::EmptyName(_))));
    }

    #[test]
    fn unknown_process_is_an_error() {
        let range = TaskRange::parse("A/1/1 <Blast>").unwrap();
        assert!(matches!(range.resolve(&pit()), Err(ModelError::UnknownProcess(_))));
    }
}

// ── Source text ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod source_text {
    use super::*;

    #[test]
    fn comment_after_first_quote() {
        assert_eq!(split_comment("A/1/1 'note 'more"), ("A/1/1 ".to_string(), Some("note 'more")));
        assert_eq!(split_comment("A/1/1"), ("A/1/1".to_string(), None));
    }

    #[test]
    fn escaped_quote_stays_in_code() {
        assert_eq!(split_comment(r"O\'Brien 'x"), ("O'Brien ".to_string(), Some("x")));
    }

    #[test]
    fn compile_tags_origin_lines() {
        let case = pit();
        let text = "A/1/1 <Drill>\n\n' comment only\ndelay 2h\nA/1/{1,2} <Load>; d:Crusher\nuntil 2024-01-09";
        let path = compile_path(text, &case).unwrap();
        let lines: Vec<usize> = path.elements().iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 4, 5, 6]);
        match &path.elements()[2].kind {
            ElementKind::Steps(steps) => {
                assert_eq!(steps.len(), 2);
                assert!(steps.iter().all(|s| s.destination == Some(TaskId(6))));
            }
            other => panic!("expected steps, got {other:?}"),
        }
        assert_eq!(path.elements()[3].kind, ElementKind::Until(day(9)));
    }

    #[test]
    fn compile_reports_bad_line() {
        let err = compile_path("A/1/1\ndelay soon", &pit()).unwrap_err();
        assert!(matches!(err, ModelError::PathLine { line: 2, .. }));
    }
}

// ── Case + library ────────────────────────────────────────────────────────────

#[cfg(test)]
mod case_and_library {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let mut case = pit();
        case.add_equipment("EX01", "");
        assert_eq!(case.process_by_name(" load ").unwrap(), ProcessId(1));
        assert_eq!(case.equipment_by_name("ex01").unwrap().0, 0);
        assert_eq!(case.find_task("crusher", TaskRole::Destination), Some(TaskId(6)));
        assert!(case.process_by_name("Blast").is_err());
    }

    #[test]
    fn loader_sorts_and_blanks_destinations() {
        let csv = "\
equipment,source,destination,start,end,quantity
EX01,A/1/2,Crusher,2024-01-03 06:00,2024-01-03 12:00,600
EX01,A/1/1,,2024-01-02 06:00,2024-01-02 18:00,1200
";
        let steps = load_schedule_reader(Cursor::new(csv)).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].source, "A/1/1");
        assert_eq!(steps[0].destination, None);
        assert_eq!(steps[1].destination.as_deref(), Some("Crusher"));
    }

    #[test]
    fn loader_rejects_reversed_steps() {
        let csv = "equipment,source,destination,start,end,quantity\nEX01,A/1/1,,2024-01-03,2024-01-02,1\n";
        assert!(matches!(load_schedule_reader(Cursor::new(csv)), Err(ModelError::Parse(_))));
    }

    #[test]
    fn loader_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plan.csv");
        std::fs::write(&file, "equipment,source,destination,start,end,quantity\nEX01,A/1/1,,2024-01-02,2024-01-03,5\n").unwrap();
        assert_eq!(crate::load_schedule_csv(&file).unwrap().len(), 1);
    }

    #[test]
    fn library_keys_ignore_case() {
        let mut lib = ScheduleLibrary::new();
        lib.insert("Base", ScheduleKind::Output, vec![]);
        assert!(lib.steps("BASE", ScheduleKind::Output).is_some());
        assert!(lib.steps("base", ScheduleKind::Input).is_none());
    }
}
