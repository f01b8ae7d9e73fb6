use thiserror::Error;

use ps_core::{EquipmentId, TaskId};

/// Syntax errors in a task-range expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("empty task range")]
    Empty,

    #[error("task range term {0:?} has no task name")]
    EmptyName(String),

    #[error("unbalanced braces in task range term {0:?}")]
    UnbalancedBrace(String),

    #[error("unterminated process filter in task range term {0:?}")]
    UnclosedFilter(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown process {0:?}")]
    UnknownProcess(String),

    #[error("unknown equipment {0:?}")]
    UnknownEquipment(String),

    #[error("{0} is not part of this case")]
    UnknownTask(TaskId),

    #[error("{0} is not part of this case")]
    UnknownEquipmentId(EquipmentId),

    #[error("invalid task range: {0}")]
    Range(#[from] RangeError),

    #[error("path line {line}: {message}")]
    PathLine { line: usize, message: String },

    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
