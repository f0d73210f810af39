//! Invocation state machine.

use serde::{Deserialize, Serialize};

/// State of one task invocation.
///
/// State transitions:
/// - NotStarted -> EnvironmentAssigned -> Executing -> Completed | Faulted
/// - NotStarted -> Executing (marker and legacy tasks: nothing to assign)
///
/// One environment serves exactly one invocation. A retried task gets a
/// fresh record (and a fresh environment), never a re-entry into this
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    /// Created, nothing injected or run yet.
    NotStarted,

    /// A fresh TaskEnvironment has been constructed and injected
    /// (interface-capable tasks only).
    EnvironmentAssigned,

    /// The task entry point is running. The only state in which task code
    /// executes.
    Executing,

    /// Entry point returned an outcome.
    Completed,

    /// Entry point (or the isolated host) failed.
    Faulted,
}

impl InvocationState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, InvocationState::Completed | InvocationState::Faulted)
    }

    /// Is `next` a legal successor of `self`?
    pub fn can_transition_to(self, next: InvocationState) -> bool {
        use InvocationState::*;
        matches!(
            (self, next),
            (NotStarted, EnvironmentAssigned)
                | (NotStarted, Executing)
                | (EnvironmentAssigned, Executing)
                | (Executing, Completed)
                | (Executing, Faulted)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::capable_flow(InvocationState::NotStarted, InvocationState::EnvironmentAssigned, true)]
    #[case::marker_flow(InvocationState::NotStarted, InvocationState::Executing, true)]
    #[case::assigned_to_executing(InvocationState::EnvironmentAssigned, InvocationState::Executing, true)]
    #[case::complete(InvocationState::Executing, InvocationState::Completed, true)]
    #[case::fault(InvocationState::Executing, InvocationState::Faulted, true)]
    #[case::no_reentry(InvocationState::Completed, InvocationState::Executing, false)]
    #[case::no_reassign(InvocationState::Executing, InvocationState::EnvironmentAssigned, false)]
    #[case::no_skip(InvocationState::NotStarted, InvocationState::Completed, false)]
    #[case::no_self_loop(InvocationState::Executing, InvocationState::Executing, false)]
    fn transition_table(
        #[case] from: InvocationState,
        #[case] to: InvocationState,
        #[case] legal: bool,
    ) {
        assert_eq!(from.can_transition_to(to), legal);
    }

    #[test]
    fn terminal_states() {
        assert!(InvocationState::Completed.is_terminal());
        assert!(InvocationState::Faulted.is_terminal());
        assert!(!InvocationState::Executing.is_terminal());
        assert!(!InvocationState::NotStarted.is_terminal());
    }

    #[test]
    fn serializes_snake_case() {
        let s = serde_json::to_string(&InvocationState::EnvironmentAssigned).unwrap();
        assert_eq!(s, "\"environment_assigned\"");
    }
}
