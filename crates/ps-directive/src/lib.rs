//! `ps-directive` — the directive language embedded in path comments.
//!
//! Planners write directives after the `'` comment marker of a path line:
//!
//! ```text
//! A/1/2 <Load>   '!waiton A/1/1 <Drill> delay=4h  !timeconstrain start=2024-01-01 end=2024-02-01
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`command`]   | `Command`, `tokenize` — lexical `!name arg key=value` scan |
//! | [`args`]      | duration/date/alias-enum/task-range argument parsers       |
//! | [`directive`] | `DirectiveKind`, `Directive`, `Directive::resolve`         |
//! | [`error`]     | `ArgumentError`, `ArgumentResult<T>`                       |
//!
//! # Pipeline
//!
//! ```text
//! comment ──tokenize──▶ Command ──DirectiveKind::from_name──▶ kind
//!                                  (unknown names dropped)
//!         kind + Command ──Directive::resolve──▶ Directive (typed arguments)
//! ```
//!
//! The gap between the two steps is where the caller enforces the enable
//! gate, so a gated directive with a bad argument reports the gate first.

pub mod args;
pub mod command;
pub mod directive;
pub mod error;


pub use args::{AliasEnum, Flag};
pub use command::{Command, Commands, tokenize};
pub use directive::{Directive, DirectiveKind, RemoveWhen, ResolveContext};
pub use error::{ArgumentError, ArgumentResult};
