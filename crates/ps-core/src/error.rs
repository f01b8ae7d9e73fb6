//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface configuration problems.

use thiserror::Error;

/// The base error type for `ps-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("run window is empty: start {start} is not before end {end}")]
    EmptyRunWindow {
        start: crate::SimTime,
        end:   crate::SimTime,
    },
}

/// Shorthand result type for `ps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
