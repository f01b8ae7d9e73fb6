//! `ps-model` — the scheduling case the directive engine works against.
//!
//! The scheduling engine proper (task selection, productivities, haulage) is
//! a separate system.  This crate holds the narrow slice of its state that
//! path directives read and mutate, in a form that can be built directly by
//! a host or by tests.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`task`]      | `Task`, `TaskRole`, `Dependency`, `TaskGraph`             |
//! | [`path`]      | `PathStep`, `ElementKind`, `PathElement`, `EquipmentPath` |
//! | [`equipment`] | `Equipment`, `ActiveWork`                                 |
//! | [`case`]      | `Process`, `Case`                                         |
//! | [`range`]     | `TaskRange` mini-language (`s:`/`d:`, `{a,b}`, `<Proc>`)   |
//! | [`source`]    | comment splitting for source path lines                   |
//! | [`compile`]   | `compile_path` — source path text → `EquipmentPath`       |
//! | [`library`]   | `ScheduleLibrary` — other cases' computed schedules       |
//! | [`loader`]    | `load_schedule_csv`, `load_schedule_reader`               |
//! | [`error`]     | `ModelError`, `RangeError`, `ModelResult<T>`              |

pub mod case;
pub mod compile;
pub mod equipment;
pub mod error;
pub mod library;
pub mod loader;
pub mod path;
pub mod range;
pub mod source;
pub mod task;

#[cfg(test)]
mod tests;

pub use case::{Case, Process};
pub use compile::compile_path;
pub use equipment::{ActiveWork, Equipment};
pub use error::{ModelError, ModelResult, RangeError};
pub use library::{ScheduleKind, ScheduleLibrary, ScheduledStep};
pub use loader::{load_schedule_csv, load_schedule_reader};
pub use path::{ElementKind, EquipmentPath, PathElement, PathStep, StepRate};
pub use range::{ProcessFilter, RoleFilter, TaskRange};
pub use source::split_comment;
pub use task::{Dependency, Task, TaskGraph, TaskRole};
