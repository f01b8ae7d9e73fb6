//! Source path compiler.
//!
//! Turns an equipment's path text into path elements the way the scheduling
//! engine does, tagging each element with its 1-based origin line.  Only the
//! code part of a line (before the comment) is read:
//!
//! | Line code                | Element                                        |
//! |--------------------------|------------------------------------------------|
//! | *(blank)*                | none                                           |
//! | `delay <duration>`       | `ElementKind::Delay`                           |
//! | `until <date>`           | `ElementKind::Until`                           |
//! | *task range*             | `ElementKind::Steps`, one step per source task |
//!
//! Each step of a task-range line pairs a matched source task with the first
//! matched destination task, if the range matched any.

use log::debug;

use ps_core::time::{parse_date, parse_duration};

use crate::{Case, ElementKind, EquipmentPath, ModelError, ModelResult, PathStep, TaskRange, TaskRole, split_comment};

/// Compile `text` against `case`.
pub fn compile_path(text: &str, case: &Case) -> ModelResult<EquipmentPath> {
    let mut path = EquipmentPath::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let (code, _) = split_comment(raw);
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        let kind = compile_line(code, case).map_err(|message| ModelError::PathLine { line, message })?;
        if let Some(kind) = kind {
            path.push(line, kind);
        }
    }
    debug!("compiled {} path elements", path.len());
    Ok(path)
}

fn compile_line(code: &str, case: &Case) -> Result<Option<ElementKind>, String> {
    let (keyword, rest) = code.split_once(char::is_whitespace).unwrap_or((code, ""));
    if keyword.eq_ignore_ascii_case("delay") {
        return parse_duration(rest)
            .map(|d| Some(ElementKind::Delay(d)))
            .ok_or_else(|| format!("invalid delay {rest:?}"));
    }
    if keyword.eq_ignore_ascii_case("until") {
        return parse_date(rest)
            .map(|d| Some(ElementKind::Until(d)))
            .ok_or_else(|| format!("invalid date {rest:?}"));
    }

    let range = TaskRange::parse(code).map_err(|e| e.to_string())?;
    let tasks = range.resolve(case).map_err(|e| e.to_string())?;
    let destination = tasks
        .iter()
        .copied()
        .find(|&t| case.tasks.get(t).is_ok_and(|t| t.role == TaskRole::Destination));
    let steps: Vec<PathStep> = tasks
        .iter()
        .copied()
        .filter(|&t| case.tasks.get(t).is_ok_and(|t| t.role == TaskRole::Source))
        .map(|t| PathStep::planned(t, destination))
        .collect();
    if steps.is_empty() {
        debug!("path range {code:?} matched no source tasks");
        return Ok(None);
    }
    Ok(Some(ElementKind::Steps(steps)))
}
