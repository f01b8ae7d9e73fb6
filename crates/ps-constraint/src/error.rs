use thiserror::Error;

use crate::EquipmentTaskKey;

#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("no time constraint #{index} registered for {key}")]
    UnknownWindow { key: EquipmentTaskKey, index: usize },
}

pub type ConstraintResult<T> = Result<T, ConstraintError>;
