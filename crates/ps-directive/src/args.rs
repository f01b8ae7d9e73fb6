//! Shared argument parsers.
//!
//! Every parser takes the argument name so failures say which argument was
//! wrong.  Optional arguments go through the `*_or` variants, which fall back
//! to a caller-supplied default only when the argument is absent.  A present
//! but malformed value is always an error.

use std::collections::BTreeSet;

use ps_core::time::{parse_date, parse_duration};
use ps_core::{RemoveTrigger, SimDuration, SimTime, TaskId, TimeMode};
use ps_model::{Case, ScheduleKind, TaskRange};

use crate::{ArgumentError, ArgumentResult};

// ── Scalars ───────────────────────────────────────────────────────────────────

/// Parse a duration that can still be added to `horizon`.
///
/// Amounts so large that `horizon + d` leaves the calendar are rejected the
/// same way as malformed text.
pub fn duration(arg: &'static str, value: &str, horizon: SimTime) -> ArgumentResult<SimDuration> {
    parse_duration(value)
        .filter(|&d| horizon.checked_add_signed(d).is_some())
        .ok_or_else(|| ArgumentError::Duration { arg, value: value.to_string() })
}

pub fn duration_or(
    arg:     &'static str,
    value:   Option<&str>,
    default: SimDuration,
    horizon: SimTime,
) -> ArgumentResult<SimDuration> {
    value.map_or(Ok(default), |v| duration(arg, v, horizon))
}

pub fn date(arg: &'static str, value: &str) -> ArgumentResult<SimTime> {
    parse_date(value).ok_or_else(|| ArgumentError::Date { arg, value: value.to_string() })
}

pub fn date_or(arg: &'static str, value: Option<&str>, default: SimTime) -> ArgumentResult<SimTime> {
    value.map_or(Ok(default), |v| date(arg, v))
}

pub fn required<'a>(arg: &'static str, value: Option<&'a str>) -> ArgumentResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ArgumentError::Missing { arg })
}

// ── Task ranges ───────────────────────────────────────────────────────────────

/// Parse a task-range expression and resolve it against `case`.
pub fn tasks(arg: &'static str, value: &str, case: &Case) -> ArgumentResult<BTreeSet<TaskId>> {
    let range = TaskRange::parse(value).map_err(|source| ArgumentError::Range { arg, source })?;
    range.resolve(case).map_err(|source| ArgumentError::Lookup { arg, source })
}

// ── Alias enums ───────────────────────────────────────────────────────────────

/// An enumeration spelled in directive text by any of several aliases.
///
/// Each entry of `ALIASES` is one value with its accepted spellings; the first
/// spelling is the canonical one.
pub trait AliasEnum: Copy + PartialEq + 'static {
    const ALIASES: &'static [(Self, &'static [&'static str])];

    /// Case-insensitive alias lookup.
    fn from_alias(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALIASES
            .iter()
            .find(|(_, names)| names.iter().any(|n| n.eq_ignore_ascii_case(text)))
            .map(|&(value, _)| value)
    }

    fn canonical(self) -> &'static str {
        Self::ALIASES
            .iter()
            .find(|(value, _)| *value == self)
            .and_then(|(_, names)| names.first().copied())
            .unwrap_or("?")
    }
}

pub fn alias<T: AliasEnum>(arg: &'static str, value: &str) -> ArgumentResult<T> {
    T::from_alias(value).ok_or_else(|| ArgumentError::Enum {
        arg,
        value:    value.to_string(),
        expected: T::ALIASES
            .iter()
            .filter_map(|(_, names)| names.first().copied())
            .collect::<Vec<_>>()
            .join("|"),
    })
}

pub fn alias_or<T: AliasEnum>(arg: &'static str, value: Option<&str>, default: T) -> ArgumentResult<T> {
    value.map_or(Ok(default), |v| alias(arg, v))
}

impl AliasEnum for TimeMode {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (TimeMode::Suppress, &["suppress", "suppressing", "block", "deny"]),
        (TimeMode::Allow, &["allow", "allowing", "permit"]),
    ];
}

impl AliasEnum for RemoveTrigger {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (RemoveTrigger::Completed, &["completed", "complete", "completion", "finished"]),
        (RemoveTrigger::Available, &["available", "availability", "ready"]),
    ];
}

impl AliasEnum for ScheduleKind {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (ScheduleKind::Output, &["output", "out", "schedule"]),
        (ScheduleKind::Input, &["input", "in", "plan"]),
    ];
}

/// Boolean switch spelled as an alias enum.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Flag(pub bool);

impl AliasEnum for Flag {
    const ALIASES: &'static [(Self, &'static [&'static str])] = &[
        (Flag(true), &["true", "yes", "y", "1", "on"]),
        (Flag(false), &["false", "no", "n", "0", "off"]),
    ];
}
