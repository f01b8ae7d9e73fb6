//! `ps-core` — foundational types for the pathsync directive engine.
//!
//! This crate is a dependency of every other `ps-*` crate.  It has no `ps-*`
//! dependencies and only `chrono` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `EquipmentId`, `TaskId`, `ProcessId`, `ElementId`         |
//! | [`time`]   | `SimTime`, duration constructors, overlap helpers         |
//! | [`config`] | `SyncConfig`, `TimeMode`, `RemoveTrigger`                 |
//! | [`error`]  | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SyncConfig`.    |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RemoveTrigger, SyncConfig, TimeMode};
pub use error::{CoreError, CoreResult};
pub use ids::{ElementId, EquipmentId, ProcessId, TaskId};
pub use time::{SimDuration, SimTime};
