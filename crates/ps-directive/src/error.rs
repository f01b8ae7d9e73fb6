use thiserror::Error;

use ps_core::SimTime;
use ps_model::{ModelError, RangeError};

/// A recognised directive carried an argument that could not be used.
///
/// Every variant names the offending argument as written by the planner
/// (`delay`, `start`, the positional argument, ...).
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("missing required argument `{arg}`")]
    Missing { arg: &'static str },

    #[error("argument `{arg}`: invalid duration {value:?} (expected <number><m|h|d|w>)")]
    Duration { arg: &'static str, value: String },

    #[error("argument `{arg}`: invalid date {value:?} (expected YYYY-MM-DD[ HH:MM[:SS]])")]
    Date { arg: &'static str, value: String },

    #[error("argument `{arg}`: {value:?} is not one of {expected}")]
    Enum {
        arg:      &'static str,
        value:    String,
        expected: String,
    },

    #[error("argument `{arg}`: {source}")]
    Range {
        arg:    &'static str,
        #[source]
        source: RangeError,
    },

    #[error("argument `{arg}`: {source}")]
    Lookup {
        arg:    &'static str,
        #[source]
        source: ModelError,
    },

    #[error("arguments `{first}` and `{second}` cannot be combined")]
    Conflict {
        first:  &'static str,
        second: &'static str,
    },

    #[error("window end {end} is not after start {start}")]
    EmptyWindow { start: SimTime, end: SimTime },
}

pub type ArgumentResult<T> = Result<T, ArgumentError>;
