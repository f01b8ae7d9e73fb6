//! Simulated time model.
//!
//! The external scheduling engine runs on calendar dates, so simulated time
//! is a `chrono::NaiveDateTime` (no time zone: every date in a case is local
//! to the mine site).  Delays are `chrono::Duration`.
//!
//! Directive text only ever names minutes, hours, days and weeks; the
//! constructors here keep fractional quantities exact to the second.

use chrono::{Duration, NaiveDateTime};

/// An instant on the simulated calendar.
pub type SimTime = NaiveDateTime;

/// A span of simulated time.
pub type SimDuration = Duration;

const SECS_PER_MINUTE: f64 = 60.0;
const SECS_PER_HOUR:   f64 = 3_600.0;
const SECS_PER_DAY:    f64 = 86_400.0;
const SECS_PER_WEEK:   f64 = 604_800.0;

/// Unit suffix accepted in duration strings.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl DurationUnit {
    /// Map a single-letter suffix (`m`, `h`, `d`, `w`), case-insensitively.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'm' => Some(Self::Minutes),
            'h' => Some(Self::Hours),
            'd' => Some(Self::Days),
            'w' => Some(Self::Weeks),
            _ => None,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
            Self::Weeks => 'w',
        }
    }

    fn secs(self) -> f64 {
        match self {
            Self::Minutes => SECS_PER_MINUTE,
            Self::Hours => SECS_PER_HOUR,
            Self::Days => SECS_PER_DAY,
            Self::Weeks => SECS_PER_WEEK,
        }
    }
}

/// Build a duration of `amount` units, rounded to the nearest second.
///
/// Returns `None` for negative, non-finite or out-of-range amounts.
pub fn duration_of(amount: f64, unit: DurationUnit) -> Option<SimDuration> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let secs = (amount * unit.secs()).round();
    if secs > i64::MAX as f64 / 1_000.0 {
        return None;
    }
    Duration::try_seconds(secs as i64)
}

/// Length of the intersection of `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Zero when the intervals do not overlap.
pub fn overlap(a_start: SimTime, a_end: SimTime, b_start: SimTime, b_end: SimTime) -> SimDuration {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start { end - start } else { Duration::zero() }
}

/// Fraction of `[start, end)` that lies inside `[window_start, window_end)`.
///
/// A zero-length interval counts as fully inside when its instant lies within
/// the window, so instantaneous steps are not dropped.
pub fn fraction_inside(
    start:        SimTime,
    end:          SimTime,
    window_start: SimTime,
    window_end:   SimTime,
) -> f64 {
    let total = end - start;
    if total <= Duration::zero() {
        return if start >= window_start && start < window_end { 1.0 } else { 0.0 };
    }
    let inside = overlap(start, end, window_start, window_end);
    inside.num_milliseconds() as f64 / total.num_milliseconds() as f64
}

// ── Text forms ────────────────────────────────────────────────────────────────

/// Date layouts accepted in path text, tried in order.  All are
/// culture-neutral: year first, numeric month.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `<number><unit>` (e.g. `30m`, `1.5h`, `2d`, `1w`).
///
/// Whitespace between number and unit is tolerated.  Returns `None` for
/// anything else, including negative amounts.
pub fn parse_duration(text: &str) -> Option<SimDuration> {
    let text = text.trim();
    let unit_char = text.chars().last()?;
    let unit = DurationUnit::from_suffix(unit_char)?;
    let number = text[..text.len() - unit_char.len_utf8()].trim();
    if number.is_empty() || number.starts_with(['+', '-']) {
        return None;
    }
    let amount: f64 = number.parse().ok()?;
    duration_of(amount, unit)
}

/// Render a duration in the largest unit that divides it exactly.
pub fn format_duration(d: SimDuration) -> String {
    let secs = d.num_seconds();
    for unit in [DurationUnit::Weeks, DurationUnit::Days, DurationUnit::Hours] {
        let per = unit.secs() as i64;
        if secs != 0 && secs % per == 0 {
            return format!("{}{}", secs / per, unit.suffix());
        }
    }
    let minutes = secs as f64 / SECS_PER_MINUTE;
    format!("{minutes}m")
}

/// Parse a date or date-time in one of the accepted layouts.
///
/// A bare date means midnight at the start of that day.
pub fn parse_date(text: &str) -> Option<SimTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| chrono::NaiveDate::parse_from_str(text, f).ok())
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
