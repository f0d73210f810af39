//! Invocation records: the per-invocation state machine and its views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    HeddleError, InvocationId, InvocationState, TaskCapability, TaskId, TaskName, TaskOutcome,
};

/// Single source of truth for one task invocation.
///
/// Design:
/// - State transitions happen via methods, validated against the machine
///   in [`InvocationState`]. An invalid transition is a caller bug and
///   fails immediately.
/// - One record per invocation; a retry allocates a new record.
#[derive(Debug, Clone)]
pub struct InvocationRecord {
    pub invocation_id: InvocationId,
    pub task_id: TaskId,
    pub task_name: TaskName,
    pub capability: TaskCapability,
    pub state: InvocationState,

    /// Set when the entry point returns.
    pub outcome: Option<TaskOutcome>,

    /// Last error message (if any).
    pub last_error: Option<String>,

    /// Timestamps for observability.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvocationRecord {
    pub fn new(
        invocation_id: InvocationId,
        task_id: TaskId,
        task_name: TaskName,
        capability: TaskCapability,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            invocation_id,
            task_id,
            task_name,
            capability,
            state: InvocationState::NotStarted,
            outcome: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, next: InvocationState, now: DateTime<Utc>) -> Result<(), HeddleError> {
        if !self.state.can_transition_to(next) {
            return Err(HeddleError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.updated_at = now;
        Ok(())
    }

    /// A fresh environment was constructed and injected (interface-capable
    /// tasks only).
    pub fn mark_environment_assigned(&mut self, now: DateTime<Utc>) -> Result<(), HeddleError> {
        self.transition(InvocationState::EnvironmentAssigned, now)
    }

    /// The entry point is about to run.
    pub fn mark_executing(&mut self, now: DateTime<Utc>) -> Result<(), HeddleError> {
        self.transition(InvocationState::Executing, now)
    }

    pub fn mark_completed(
        &mut self,
        outcome: TaskOutcome,
        now: DateTime<Utc>,
    ) -> Result<(), HeddleError> {
        self.transition(InvocationState::Completed, now)?;
        self.outcome = Some(outcome);
        Ok(())
    }

    pub fn mark_faulted(&mut self, error: String, now: DateTime<Utc>) -> Result<(), HeddleError> {
        self.transition(InvocationState::Faulted, now)?;
        self.last_error = Some(error);
        Ok(())
    }

    pub fn status(&self) -> InvocationStatus {
        InvocationStatus {
            invocation_id: self.invocation_id,
            task_id: self.task_id,
            task_name: self.task_name.clone(),
            capability: self.capability,
            state: self.state,
            outcome: self.outcome.clone(),
            last_error: self.last_error.clone(),
            created_at_ms: self.created_at.timestamp_millis(),
            updated_at_ms: self.updated_at.timestamp_millis(),
        }
    }
}

/// Serializable view of an invocation, for status responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationStatus {
    pub invocation_id: InvocationId,
    pub task_id: TaskId,
    pub task_name: TaskName,
    pub capability: TaskCapability,
    pub state: InvocationState,
    pub outcome: Option<TaskOutcome>,
    pub last_error: Option<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Counts by state for observability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationCounts {
    pub not_started: usize,
    pub environment_assigned: usize,
    pub executing: usize,
    pub completed: usize,
    pub faulted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use ulid::Ulid;

    fn record() -> InvocationRecord {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        InvocationRecord::new(
            InvocationId::from_ulid(Ulid::new()),
            TaskId::from_ulid(Ulid::new()),
            TaskName::new("emit"),
            TaskCapability::InterfaceCapable,
            now,
        )
    }

    #[test]
    fn capable_flow_walks_the_full_machine() {
        let mut rec = record();
        let now = rec.created_at;

        rec.mark_environment_assigned(now).unwrap();
        rec.mark_executing(now).unwrap();
        rec.mark_completed(TaskOutcome::success(), now).unwrap();

        assert_eq!(rec.state, InvocationState::Completed);
        assert!(rec.outcome.is_some());
    }

    #[test]
    fn marker_flow_skips_environment_assignment() {
        let mut rec = record();
        let now = rec.created_at;

        rec.mark_executing(now).unwrap();
        rec.mark_faulted("boom".to_string(), now).unwrap();

        assert_eq!(rec.state, InvocationState::Faulted);
        assert_eq!(rec.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn no_reentry_into_a_finished_invocation() {
        let mut rec = record();
        let now = rec.created_at;
        rec.mark_executing(now).unwrap();
        rec.mark_completed(TaskOutcome::success(), now).unwrap();

        let err = rec.mark_executing(now).unwrap_err();
        assert!(matches!(
            err,
            HeddleError::InvalidTransition {
                from: InvocationState::Completed,
                to: InvocationState::Executing,
            }
        ));
    }

    #[test]
    fn environment_cannot_be_assigned_twice() {
        let mut rec = record();
        let now = rec.created_at;
        rec.mark_environment_assigned(now).unwrap();

        assert!(rec.mark_environment_assigned(now).is_err());
    }

    #[test]
    fn status_carries_millisecond_timestamps() {
        let mut rec = record();
        let later = rec.created_at + chrono::Duration::milliseconds(250);
        rec.mark_executing(later).unwrap();

        let status = rec.status();
        assert_eq!(status.state, InvocationState::Executing);
        assert_eq!(status.updated_at_ms - status.created_at_ms, 250);
    }
}
