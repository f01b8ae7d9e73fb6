//! Run-level configuration for directive parsing and constraint evaluation.

use chrono::Duration;

use crate::{CoreError, CoreResult, SimTime};

// ── Enumerated modes shared by config and directives ──────────────────────────

/// Whether a time constraint blocks or exclusively permits its task.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeMode {
    /// The task is unavailable while the window is active.
    #[default]
    Suppress,
    /// The task is unavailable until the window opens, and available while it
    /// is open regardless of suppressing windows.
    Allow,
}

/// Lifecycle event of a task set that triggers a deferred `remove`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RemoveTrigger {
    /// Every task in the set has completed.
    #[default]
    Completed,
    /// Every direct predecessor of the set has completed.
    Available,
}

// ── SyncConfig ────────────────────────────────────────────────────────────────

/// Configuration for one scheduling run.
///
/// Usually built by the host from its case settings, or loaded from a
/// TOML/JSON file with the `serde` feature.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncConfig {
    /// First instant of the simulated run.  Default for omitted start dates.
    pub run_start: SimTime,

    /// End of the simulated run (exclusive).  Default for omitted end dates;
    /// `forcecomplete` dates after it are skipped.
    pub run_end: SimTime,

    /// When `true`, directives other than `enable` raise a gate error until an
    /// `enable` directive has been seen in the same path.
    pub require_enable: bool,

    /// Release delay applied when a wait or dependency directive gives none.
    #[cfg_attr(feature = "serde", serde(with = "secs", default = "Duration::zero"))]
    pub default_release_delay: Duration,

    /// Mode applied when `timeconstrain` omits `mode=`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_time_mode: TimeMode,

    /// Trigger applied when `remove` names tasks but omits `on=`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_remove_trigger: RemoveTrigger,
}

impl SyncConfig {
    /// Config for `[run_start, run_end)` with the enable gate required and
    /// every other setting at its default.
    pub fn new(run_start: SimTime, run_end: SimTime) -> Self {
        Self {
            run_start,
            run_end,
            require_enable:         true,
            default_release_delay:  Duration::zero(),
            default_time_mode:      TimeMode::default(),
            default_remove_trigger: RemoveTrigger::default(),
        }
    }

    /// Reject configurations the runtime cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        if self.run_start >= self.run_end {
            return Err(CoreError::EmptyRunWindow { start: self.run_start, end: self.run_end });
        }
        if self.default_release_delay < Duration::zero() {
            return Err(CoreError::Config("default_release_delay must not be negative".into()));
        }
        Ok(())
    }

    /// `true` if `at` falls inside the run window.
    #[inline]
    pub fn contains(&self, at: SimTime) -> bool {
        at >= self.run_start && at < self.run_end
    }
}

#[cfg(feature = "serde")]
mod secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Duration::try_seconds(secs).ok_or_else(|| serde::de::Error::custom("duration out of range"))
    }
}
