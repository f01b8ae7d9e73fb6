//! Task-range expressions.
//!
//! A range picks tasks out of a case by name, role and process:
//!
//! ```text
//! range   = term { ";" term }
//! term    = [ "s:" | "d:" ] pattern [ "<" filter ">" ]
//! filter  = "*" | process { "," process }
//! ```
//!
//! - `s:` restricts to source tasks, `d:` to destination tasks; with no
//!   prefix both roles match.
//! - `{a,b}` inside a pattern expands to one pattern per alternative; several
//!   groups expand to their cartesian product (`A/{1,2}/{1,2}` is four names).
//! - `*` inside a pattern matches any run of characters.
//! - `<*>` and an omitted filter both mean every process.
//!
//! Names and process names compare case-insensitively.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use ps_core::{ProcessId, TaskId};

use crate::{Case, ModelResult, RangeError, Task, TaskRole};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RoleFilter {
    Any,
    Source,
    Destination,
}

impl RoleFilter {
    fn admits(self, role: TaskRole) -> bool {
        match self {
            Self::Any => true,
            Self::Source => role == TaskRole::Source,
            Self::Destination => role == TaskRole::Destination,
        }
    }
}

/// Process restriction of one range term.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProcessFilter {
    All,
    /// Lower-cased process names.
    Subset(Vec<String>),
}

#[derive(Clone, PartialEq, Eq, Debug)]
struct RangeTerm {
    role:      RoleFilter,
    /// Lower-cased glob patterns after brace expansion.
    patterns:  Vec<String>,
    processes: ProcessFilter,
}

/// A parsed task-range expression.  Resolve it against a case with
/// [`TaskRange::resolve`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TaskRange {
    text:  String,
    terms: Vec<RangeTerm>,
}

impl TaskRange {
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RangeError::Empty);
        }
        let terms = text.split(';').map(parse_term).collect::<Result<_, _>>()?;
        Ok(Self { text: text.to_string(), terms })
    }

    /// All tasks of `case` matched by any term, in id order.
    ///
    /// A range that matches nothing yields an empty set.  A process filter
    /// naming a process the case does not have is an error.
    pub fn resolve(&self, case: &Case) -> ModelResult<BTreeSet<TaskId>> {
        let mut out = BTreeSet::new();
        for term in &self.terms {
            let processes: Option<BTreeSet<ProcessId>> = match &term.processes {
                ProcessFilter::All => None,
                ProcessFilter::Subset(names) => Some(
                    names
                        .iter()
                        .map(|n| case.process_by_name(n))
                        .collect::<ModelResult<_>>()?,
                ),
            };
            out.extend(
                case.tasks
                    .iter()
                    .filter(|t| term.matches(t, processes.as_ref()))
                    .map(|t| t.id),
            );
        }
        Ok(out)
    }
}

impl RangeTerm {
    fn matches(&self, task: &Task, processes: Option<&BTreeSet<ProcessId>>) -> bool {
        if !self.role.admits(task.role) {
            return false;
        }
        if processes.is_some_and(|set| !set.contains(&task.process)) {
            return false;
        }
        let name = task.name.to_lowercase();
        self.patterns.iter().any(|p| glob_match(p, &name))
    }
}

impl FromStr for TaskRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TaskRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

fn parse_term(raw: &str) -> Result<RangeTerm, RangeError> {
    let term = raw.trim();
    let (role, rest) = match term.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("s:") => (RoleFilter::Source, &term[2..]),
        Some("d:") => (RoleFilter::Destination, &term[2..]),
        _ => (RoleFilter::Any, term),
    };

    let (name, processes) = match rest.find('<') {
        Some(open) => {
            let filter = rest[open + 1..]
                .trim_end()
                .strip_suffix('>')
                .ok_or_else(|| RangeError::UnclosedFilter(term.to_string()))?;
            (&rest[..open], parse_filter(filter))
        }
        None if rest.contains('>') => return Err(RangeError::UnclosedFilter(term.to_string())),
        None => (rest, ProcessFilter::All),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(RangeError::EmptyName(term.to_string()));
    }
    let patterns = expand_braces(name).ok_or_else(|| RangeError::UnbalancedBrace(term.to_string()))?;
    Ok(RangeTerm { role, patterns, processes })
}

fn parse_filter(inner: &str) -> ProcessFilter {
    let names: Vec<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_lowercase)
        .collect();
    if names.is_empty() || names.iter().any(|n| n == "*") {
        ProcessFilter::All
    } else {
        ProcessFilter::Subset(names)
    }
}

/// Expand `{a,b}` groups into lower-cased alternatives.  `None` on unbalanced
/// or nested braces.
fn expand_braces(pattern: &str) -> Option<Vec<String>> {
    let mut out = vec![String::new()];
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let prefix = &rest[..open];
        let close = open + rest[open..].find('}')?;
        let inner = &rest[open + 1..close];
        if prefix.contains('}') || inner.contains('{') {
            return None;
        }
        let alternatives: Vec<&str> = inner.split(',').map(str::trim).collect();
        out = out
            .iter()
            .flat_map(|head| alternatives.iter().map(move |alt| format!("{head}{prefix}{alt}")))
            .collect();
        rest = &rest[close + 1..];
    }
    if rest.contains('}') {
        return None;
    }
    Some(out.into_iter().map(|p| (p + rest).to_lowercase()).collect())
}

/// Match `text` against a pattern where `*` stands for any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let Some((head, tail)) = pattern.split_once('*') else {
        return pattern == text;
    };
    let Some(mut rest) = text.strip_prefix(head) else {
        return false;
    };
    let mut pieces = tail.split('*').peekable();
    while let Some(piece) = pieces.next() {
        if pieces.peek().is_none() {
            return rest.ends_with(piece);
        }
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    true
}
