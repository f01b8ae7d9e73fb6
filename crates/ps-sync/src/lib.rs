//! `ps-sync` — turns path directives into scheduling constraints and keeps
//! them current through a run.
//!
//! # Setup
//!
//! ```text
//! for each equipment:
//!   ① Walk    — pair each source line with the elements compiled from it
//!                (single forward cursor) and split off its comment.
//!   ② Gate    — `enable`/`disable` switch directive handling for the path;
//!                other directives before `enable` are an error.
//!   ③ Resolve — tokenize, drop unknown names, parse typed arguments.
//!   ④ Interpret (pure) — each directive → registrations + pending effects.
//!   ⑤ Commit  — only after every line succeeded:
//!                Wait / Window       → ConstraintEngine (+ window callbacks)
//!                Now(a)              → apply immediately
//!                At(t, a)            → Timeline
//!                OnCompletion{..}    → completion watch
//!                OnSelection{..}     → selection watch
//! ```
//!
//! # Run
//!
//! The scheduler reports `task_completed`, `task_selected`, `task_released`
//! and `advance_to`, and asks `is_available` before every selection.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`walker`]    | `PathWalker`, `WalkedLine`, `EnableGate`                |
//! | [`interpret`] | `Interpreter` — directives → `LineOutcome`              |
//! | [`effect`]    | `Registration`, `Action`, `Effect`, `LineOutcome`       |
//! | [`timeline`]  | `Timeline` — dated action queue                         |
//! | [`runtime`]   | `SyncRuntime` — commit, callbacks, predicate            |
//! | [`builder`]   | `RuntimeBuilder`                                        |
//! | [`observer`]  | `SyncObserver`, `NoopObserver`, `LineContext`, `SetupSummary` |
//! | [`error`]     | `DirectiveError`, `SyncError`, `SyncResult<T>`          |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                            |
//! |-----------|---------------------------------------------------|
//! | `fx-hash` | FxHash for the constraint engine's waits map.     |

pub mod builder;
pub mod effect;
pub mod error;
pub mod interpret;
pub mod observer;
pub mod runtime;
pub mod timeline;
pub mod walker;


pub use builder::RuntimeBuilder;
pub use effect::{Action, Effect, LineOutcome, Registration};
pub use error::{DirectiveError, SyncError, SyncResult};
pub use interpret::Interpreter;
pub use observer::{LineContext, NoopObserver, SetupSummary, SyncObserver};
pub use runtime::SyncRuntime;
pub use timeline::Timeline;
pub use walker::{EnableGate, GateState, PathWalker, WalkedLine};
