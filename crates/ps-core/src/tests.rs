//! Unit tests for ps-core.

use chrono::{Duration, NaiveDate};

use crate::time::{DurationUnit, duration_of, fraction_inside, overlap};
use crate::{CoreError, SimTime, SyncConfig, TaskId};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn day(d: u32) -> SimTime {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

// ── Ids ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        assert_eq!(TaskId(7).to_string(), "task#7");
    }

    #[test]
    fn index_round_trips_through_usize() {
        let id = TaskId::try_from(42usize).unwrap();
        assert_eq!(id.index(), 42);
        assert_eq!(usize::from(id), 42);
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod time {
    use super::*;

    #[test]
    fn units_scale_to_seconds() {
        assert_eq!(duration_of(30.0, DurationUnit::Minutes), Some(Duration::minutes(30)));
        assert_eq!(duration_of(1.5, DurationUnit::Hours), Some(Duration::minutes(90)));
        assert_eq!(duration_of(2.0, DurationUnit::Days), Some(Duration::hours(48)));
        assert_eq!(duration_of(1.0, DurationUnit::Weeks), Some(Duration::days(7)));
    }

    #[test]
    fn negative_and_nan_rejected() {
        assert_eq!(duration_of(-1.0, DurationUnit::Hours), None);
        assert_eq!(duration_of(f64::NAN, DurationUnit::Hours), None);
    }

    #[test]
    fn suffix_lookup_is_case_insensitive() {
        assert_eq!(DurationUnit::from_suffix('H'), Some(DurationUnit::Hours));
        assert_eq!(DurationUnit::from_suffix('x'), None);
    }

    #[test]
    fn overlap_of_disjoint_windows_is_zero() {
        assert_eq!(overlap(day(1), day(2), day(3), day(4)), Duration::zero());
        assert_eq!(overlap(day(1), day(5), day(3), day(9)), Duration::days(2));
    }

    #[test]
    fn fraction_inside_window() {
        assert_eq!(fraction_inside(day(1), day(5), day(3), day(9)), 0.5);
        assert_eq!(fraction_inside(day(3), day(4), day(1), day(9)), 1.0);
        // Instantaneous step inside the window is kept whole.
        assert_eq!(fraction_inside(day(3), day(3), day(1), day(9)), 1.0);
        assert_eq!(fraction_inside(day(9), day(9), day(1), day(9)), 0.0);
    }
}

// ── SyncConfig ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn new_requires_enable_gate() {
        let cfg = SyncConfig::new(day(1), day(31));
        assert!(cfg.require_enable);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_window_rejected() {
        let cfg = SyncConfig::new(day(5), day(5));
        assert!(matches!(cfg.validate(), Err(CoreError::EmptyRunWindow { .. })));
    }

    #[test]
    fn contains_is_half_open() {
        let cfg = SyncConfig::new(day(1), day(31));
        assert!(cfg.contains(day(1)));
        assert!(!cfg.contains(day(31)));
    }
}

// ── Text forms ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod text_forms {
    use chrono::NaiveDate;

    use super::*;
    use crate::time::{format_duration, parse_date, parse_duration};

    #[test]
    fn durations_parse_with_units() {
        assert_eq!(parse_duration("45m"), Some(Duration::minutes(45)));
        assert_eq!(parse_duration(" 1.5 h "), Some(Duration::minutes(90)));
        assert_eq!(parse_duration("2D"), Some(Duration::days(2)));
    }

    #[test]
    fn malformed_durations_rejected() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("12"), None);
        assert_eq!(parse_duration("-3h"), None);
        assert_eq!(parse_duration("3y"), None);
    }

    #[test]
    fn durations_format_in_largest_exact_unit() {
        assert_eq!(format_duration(Duration::days(14)), "2w");
        assert_eq!(format_duration(Duration::hours(36)), "36h");
        assert_eq!(format_duration(Duration::minutes(90)), "90m");
    }

    #[test]
    fn dates_parse_in_each_layout() {
        let midnight = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let half_six = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(6, 30, 0).unwrap();
        assert_eq!(parse_date("2024-02-01"), Some(midnight));
        assert_eq!(parse_date("2024/02/01"), Some(midnight));
        assert_eq!(parse_date("2024-02-01 06:30"), Some(half_six));
        assert_eq!(parse_date("2024-02-01T06:30:00"), Some(half_six));
        assert_eq!(parse_date("01/02/2024"), None);
    }
}
