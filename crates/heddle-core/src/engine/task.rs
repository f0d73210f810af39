//! Task contracts: the execute entry point, the environment slot, and the
//! registration-time capability declaration.

use async_trait::async_trait;

use crate::domain::{HeddleError, TaskCapability, TaskOutcome};
use crate::env::TaskEnvironment;

/// One independently schedulable unit of build work.
///
/// Implementations are stateful and single-use: the engine creates a fresh
/// instance per invocation through a [`TaskFactory`], so a retried task
/// never sees a previous run's state (or its environment).
#[async_trait]
pub trait BuildTask: Send {
    async fn execute(&mut self) -> Result<TaskOutcome, HeddleError>;
}

/// The interface opt-in: a settable slot for the injected environment.
///
/// Declaring this is a promise to route every working-directory-relative
/// and environment-variable operation through the assigned environment
/// instead of ambient process state. The engine assigns exactly once,
/// before `execute` runs.
pub trait ConcurrentTask: BuildTask {
    fn assign_environment(&mut self, environment: TaskEnvironment);
}

/// A task instance together with its declared capability.
///
/// Design note: a sum type instead of runtime downcasting keeps the
/// engine's dispatch an explicit, exhaustive match.
pub enum TaskDeclaration {
    /// Interface opt-in: receives a TaskEnvironment before `execute`.
    Concurrent(Box<dyn ConcurrentTask>),

    /// Marker opt-in: no slot, no code changes. Trusted to touch no
    /// process-global state at all; only the external static analyzer can
    /// check that.
    Marker(Box<dyn BuildTask>),

    /// Legacy contract: must run under OS process isolation.
    Legacy(Box<dyn BuildTask>),
}

impl TaskDeclaration {
    pub fn capability(&self) -> TaskCapability {
        match self {
            TaskDeclaration::Concurrent(_) => TaskCapability::InterfaceCapable,
            TaskDeclaration::Marker(_) => TaskCapability::MarkerCapable,
            TaskDeclaration::Legacy(_) => TaskCapability::NotCapable,
        }
    }
}

/// Creates a fresh declaration per invocation from a JSON payload.
pub trait TaskFactory: Send + Sync {
    fn create(&self, payload: serde_json::Value) -> Result<TaskDeclaration, HeddleError>;
}

/// Closures work as factories directly.
impl<F> TaskFactory for F
where
    F: Fn(serde_json::Value) -> Result<TaskDeclaration, HeddleError> + Send + Sync,
{
    fn create(&self, payload: serde_json::Value) -> Result<TaskDeclaration, HeddleError> {
        self(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl BuildTask for Noop {
        async fn execute(&mut self) -> Result<TaskOutcome, HeddleError> {
            Ok(TaskOutcome::success())
        }
    }

    impl ConcurrentTask for Noop {
        fn assign_environment(&mut self, _environment: TaskEnvironment) {}
    }

    #[test]
    fn declaration_maps_to_capability() {
        assert_eq!(
            TaskDeclaration::Concurrent(Box::new(Noop)).capability(),
            TaskCapability::InterfaceCapable
        );
        assert_eq!(
            TaskDeclaration::Marker(Box::new(Noop)).capability(),
            TaskCapability::MarkerCapable
        );
        assert_eq!(
            TaskDeclaration::Legacy(Box::new(Noop)).capability(),
            TaskCapability::NotCapable
        );
    }

    #[test]
    fn closures_are_factories() {
        let factory = |_payload: serde_json::Value| Ok(TaskDeclaration::Marker(Box::new(Noop)));
        let declaration = TaskFactory::create(&factory, serde_json::json!({})).unwrap();
        assert_eq!(declaration.capability(), TaskCapability::MarkerCapable);
    }
}
