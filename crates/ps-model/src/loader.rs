//! CSV schedule loader.
//!
//! # CSV format
//!
//! One row per worked step, in any order:
//!
//! ```csv
//! equipment,source,destination,start,end,quantity
//! EX01,A/1/1,,2024-01-02 06:00,2024-01-02 18:00,12000
//! EX01,A/1/2,Crusher,2024-01-03 06:00,2024-01-03 12:00,6000
//! ```
//!
//! `destination` may be empty.  Dates use any layout accepted by
//! [`ps_core::time::parse_date`].  Rows are returned sorted by start date.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ps_core::time::parse_date;

use crate::{ModelError, ScheduledStep};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScheduleRecord {
    equipment:   String,
    source:      String,
    destination: Option<String>,
    start:       String,
    end:         String,
    quantity:    f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a computed schedule from a CSV file.
pub fn load_schedule_csv(path: &Path) -> Result<Vec<ScheduledStep>, ModelError> {
    let file = std::fs::File::open(path).map_err(ModelError::Io)?;
    load_schedule_reader(file)
}

/// Like [`load_schedule_csv`] but accepts any `Read` source.
pub fn load_schedule_reader<R: Read>(reader: R) -> Result<Vec<ScheduledStep>, ModelError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut steps = Vec::new();

    for result in csv_reader.deserialize::<ScheduleRecord>() {
        let row = result.map_err(|e| ModelError::Parse(e.to_string()))?;
        let start = parse_row_date(&row.start)?;
        let end = parse_row_date(&row.end)?;
        if end < start {
            return Err(ModelError::Parse(format!(
                "step {} on {} ends before it starts",
                row.source, row.equipment
            )));
        }
        steps.push(ScheduledStep {
            equipment:   row.equipment,
            source:      row.source,
            destination: row.destination.filter(|d| !d.trim().is_empty()),
            start,
            end,
            quantity:    row.quantity,
        });
    }

    steps.sort_by_key(|s| s.start);
    Ok(steps)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_row_date(s: &str) -> Result<ps_core::SimTime, ModelError> {
    parse_date(s).ok_or_else(|| ModelError::Parse(format!("invalid date {s:?}")))
}
