//! Already-computed schedules of other cases, keyed by case name.

use std::collections::HashMap;

use ps_core::SimTime;

/// Which of a case's schedules to read.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum ScheduleKind {
    /// The schedule the engine produced.
    #[default]
    Output,
    /// The schedule the case was seeded with.
    Input,
}

/// One worked step of a computed schedule.  Tasks are referenced by name so
/// steps can be carried between cases.
#[derive(Clone, PartialEq, Debug)]
pub struct ScheduledStep {
    pub equipment:   String,
    pub source:      String,
    pub destination: Option<String>,
    pub start:       SimTime,
    pub end:         SimTime,
    pub quantity:    f64,
}

#[derive(Clone, Debug, Default)]
pub struct ScheduleLibrary {
    /// Lower-cased case name → schedules by kind.
    cases: HashMap<String, HashMap<ScheduleKind, Vec<ScheduledStep>>>,
}

impl ScheduleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `steps` as the `kind` schedule of `case`, replacing any previous.
    pub fn insert(&mut self, case: &str, kind: ScheduleKind, steps: Vec<ScheduledStep>) {
        let _ = self
            .cases
            .entry(case.trim().to_lowercase())
            .or_default()
            .insert(kind, steps);
    }

    /// Steps of `case`'s `kind` schedule, or `None` if it was never loaded.
    pub fn steps(&self, case: &str, kind: ScheduleKind) -> Option<&[ScheduledStep]> {
        self.cases
            .get(&case.trim().to_lowercase())?
            .get(&kind)
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
