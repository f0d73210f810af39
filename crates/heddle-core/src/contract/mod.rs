//! Static-analysis contract: the operations a concurrency-capable task
//! must not perform, and what to route through instead.
//!
//! This is policy, not enforcement. The runtime cannot catch ambient-state
//! access (the failure mode is a silent wrong-directory resolution, not an
//! error), so a separate analyzer consumes this table and flags call sites
//! before they reach runtime. The runtime core must stay consistent
//! with the replacements listed here.

use serde::{Deserialize, Serialize};

/// Process-global operations that break per-task isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsafeOperation {
    /// Reading the real process working directory.
    ReadCurrentDirectory,

    /// Changing the real process working directory.
    SetCurrentDirectory,

    /// Reading a variable from the real process environment block.
    ReadProcessEnvironment,

    /// Writing a variable into the real process environment block.
    WriteProcessEnvironment,

    /// Resolving a relative path against ambient process state.
    ResolveRelativePath,

    /// Spawning a child that inherits the real environment block and
    /// working directory.
    SpawnWithInheritedEnvironment,

    /// Changing the process-wide locale.
    SetProcessLocale,
}

impl UnsafeOperation {
    pub const ALL: &'static [UnsafeOperation] = &[
        UnsafeOperation::ReadCurrentDirectory,
        UnsafeOperation::SetCurrentDirectory,
        UnsafeOperation::ReadProcessEnvironment,
        UnsafeOperation::WriteProcessEnvironment,
        UnsafeOperation::ResolveRelativePath,
        UnsafeOperation::SpawnWithInheritedEnvironment,
        UnsafeOperation::SetProcessLocale,
    ];

    /// Why this operation races under concurrent task execution.
    pub fn rationale(self) -> &'static str {
        match self {
            UnsafeOperation::ReadCurrentDirectory => {
                "the process working directory belongs to no task once several run at once"
            }
            UnsafeOperation::SetCurrentDirectory => {
                "changes the directory under every other running task's feet"
            }
            UnsafeOperation::ReadProcessEnvironment => {
                "observes another task's concurrent writes non-deterministically"
            }
            UnsafeOperation::WriteProcessEnvironment => {
                "becomes visible to every other running task and their children"
            }
            UnsafeOperation::ResolveRelativePath => {
                "resolves against whichever directory the process happens to have"
            }
            UnsafeOperation::SpawnWithInheritedEnvironment => {
                "leaks another task's directory and variables onto the child"
            }
            UnsafeOperation::SetProcessLocale => {
                "changes parsing and formatting behavior for every running task"
            }
        }
    }

    /// The isolation-safe API to route through instead.
    pub fn replacement(self) -> &'static str {
        match self {
            UnsafeOperation::ReadCurrentDirectory => "TaskEnvironment::current_directory",
            UnsafeOperation::SetCurrentDirectory => {
                "per-invocation logical directory (WorkRequest::project_directory)"
            }
            UnsafeOperation::ReadProcessEnvironment => "TaskEnvironment::var",
            UnsafeOperation::WriteProcessEnvironment => "TaskEnvironment::set_var",
            UnsafeOperation::ResolveRelativePath => "TaskEnvironment::absolute_path",
            UnsafeOperation::SpawnWithInheritedEnvironment => {
                "TaskEnvironment::process_start_info"
            }
            UnsafeOperation::SetProcessLocale => {
                "no replacement: format and parse with an explicit locale per call site"
            }
        }
    }
}

/// Export the whole table for the external analyzer.
pub fn policy_json() -> serde_json::Value {
    serde_json::Value::Array(
        UnsafeOperation::ALL
            .iter()
            .map(|op| {
                serde_json::json!({
                    "operation": op,
                    "rationale": op.rationale(),
                    "replacement": op.replacement(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_table_covers_every_variant() {
        // Exhaustiveness guard: adding a variant without extending ALL
        // breaks this match first.
        for op in UnsafeOperation::ALL {
            match op {
                UnsafeOperation::ReadCurrentDirectory
                | UnsafeOperation::SetCurrentDirectory
                | UnsafeOperation::ReadProcessEnvironment
                | UnsafeOperation::WriteProcessEnvironment
                | UnsafeOperation::ResolveRelativePath
                | UnsafeOperation::SpawnWithInheritedEnvironment
                | UnsafeOperation::SetProcessLocale => {}
            }
        }
        assert_eq!(UnsafeOperation::ALL.len(), 7);
    }

    #[test]
    fn serializes_snake_case_for_tooling() {
        let s = serde_json::to_string(&UnsafeOperation::ReadCurrentDirectory).unwrap();
        assert_eq!(s, "\"read_current_directory\"");
    }

    #[test]
    fn policy_export_pairs_every_operation_with_a_replacement() {
        let policy = policy_json();
        let entries = policy.as_array().unwrap();
        assert_eq!(entries.len(), UnsafeOperation::ALL.len());
        for entry in entries {
            assert!(entry["operation"].is_string());
            assert!(!entry["rationale"].as_str().unwrap().is_empty());
            assert!(!entry["replacement"].as_str().unwrap().is_empty());
        }
    }
}
