//! `ps-constraint` — runtime constraint state consulted by the scheduler.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`key`]    | `EquipmentTaskKey`, `SourceLine`                             |
//! | [`wait`]   | `WaitCounter` — predecessor countdown with release delay     |
//! | [`window`] | `TimeConstraint` — dated suppress/allow window               |
//! | [`engine`] | `Waits`, `ConstraintEngine`, handles, availability predicate |
//! | [`error`]  | `ConstraintError`, `ConstraintResult<T>`                     |
//!
//! # State machine (per key)
//!
//! ```text
//! no entry ──first registration──▶ Waits { wait_ons, time_constraints }
//!          ──more registrations (setup only, append-only)──▶ …
//!          ──completion / window callbacks during the run──▶ …
//! ```
//!
//! A key with no entry is always available.  The predicate never mutates
//! state; every transition goes through a named method so it can be driven
//! directly in tests.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the waits map.        |

pub mod engine;
pub mod error;
pub mod key;
pub mod wait;
pub mod window;


pub use engine::{ConstraintEngine, CounterHandle, WindowHandle, Waits};
pub use error::{ConstraintError, ConstraintResult};
pub use key::{EquipmentTaskKey, SourceLine};
pub use wait::WaitCounter;
pub use window::TimeConstraint;
