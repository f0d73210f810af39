//! Task capability declarations and the execution-mode dispatch.

use serde::{Deserialize, Serialize};

/// How a task declared (or failed to declare) concurrency safety.
///
/// Design note: dispatch on this enum is an explicit, exhaustive match;
/// the engine never probes task objects for hidden interfaces at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCapability {
    /// Legacy contract: free use of process-global state. Isolation comes
    /// from OS process boundaries, not in-process discipline.
    NotCapable,

    /// Exposes the TaskEnvironment slot and routes all directory- and
    /// environment-variable access through it.
    InterfaceCapable,

    /// Trust-based annotation: promises to touch no process-global state
    /// at all. The engine cannot verify this at runtime; only the external
    /// static analyzer can.
    MarkerCapable,
}

/// Where the engine may run a task with a given declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Concurrently, inside the engine process.
    InProcess,

    /// In a dedicated worker process.
    IsolatedProcess,
}

impl TaskCapability {
    pub fn is_concurrent_safe(self) -> bool {
        !matches!(self, TaskCapability::NotCapable)
    }

    /// Only interface-capable tasks have a slot to inject into.
    pub fn receives_environment(self) -> bool {
        matches!(self, TaskCapability::InterfaceCapable)
    }

    pub fn execution_mode(self) -> ExecutionMode {
        match self {
            TaskCapability::NotCapable => ExecutionMode::IsolatedProcess,
            TaskCapability::InterfaceCapable | TaskCapability::MarkerCapable => {
                ExecutionMode::InProcess
            }
        }
    }
}
