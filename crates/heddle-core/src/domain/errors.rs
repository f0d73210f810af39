use thiserror::Error;

use super::state::InvocationState;
use super::task::TaskName;

/// Error taxonomy of the isolation core.
///
/// Validation failures here are synchronous programming-contract
/// violations: surfaced immediately, never swallowed, never retried at
/// this layer.
#[derive(Debug, Error)]
pub enum HeddleError {
    /// A caller violated a constructor contract (empty or non-rooted path
    /// where rootedness is required). The message names the offending value
    /// so diagnostics show what was actually passed in.
    #[error("invalid argument: {reason}: '{value}'")]
    InvalidArgument { value: String, reason: &'static str },

    /// Functionality intentionally left to an external collaborator.
    #[error("not supported: {0}")]
    NotSupported(&'static str),

    #[error("no task registered for name={0}")]
    TaskNotFound(TaskName),

    #[error("duplicate task registration for name={0}")]
    DuplicateTask(TaskName),

    #[error("invalid invocation state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: InvocationState,
        to: InvocationState,
    },

    #[error("{0}")]
    Other(String),
}
