use ps_constraint::ConstraintError;
use ps_core::CoreError;
use ps_directive::ArgumentError;
use ps_model::{ModelError, ScheduleKind};
use thiserror::Error;

/// Failure of one directive on one path line.
#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error(
        "`!{directive}` is not enabled for this path; \
         put `'!enable` on an earlier line to turn path directives on"
    )]
    Gate { directive: &'static str },

    #[error("`!{directive}`: {source}")]
    Argument {
        directive: &'static str,
        #[source]
        source:    ArgumentError,
    },

    #[error("`!deadhead` needs a process: pass process=<name> or give the equipment an inactive process")]
    NoIdleProcess,

    #[error("`!injectschedulepath`: case `{case}` has no {kind:?} schedule loaded")]
    NoSchedule { case: String, kind: ScheduleKind },

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    /// A directive failed; the whole path of `equipment` was rejected.
    #[error("equipment `{equipment}`, line {line}: {source}")]
    Line {
        equipment: String,
        line:      usize,
        #[source]
        source:    DirectiveError,
    },

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

pub type SyncResult<T> = Result<T, SyncError>;
