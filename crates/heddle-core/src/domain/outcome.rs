//! Outcome model: common result format for task invocations.
//!
//! This module is architecture-agnostic: it does not assume workers or
//! scheduling. It only defines the "shape" of results the engine can
//! record and report later.

use serde::{Deserialize, Serialize};

/// A unified classification of an invocation result.
///
/// Serialized as SCREAMING_SNAKE_CASE: SUCCESS / FAILURE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// A reference to something produced or observed during execution.
///
/// Keep this flexible: artifacts feed reporting and can be extended
/// without changing the execution model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Artifact {
    /// Standard output captured from a spawned tool.
    Stdout(String),

    /// Standard error captured from a spawned tool.
    Stderr(String),

    /// Path to a file produced or consumed.
    FilePath(String),

    /// Arbitrary JSON payload (structured observation/output).
    Json(serde_json::Value),
}

/// A common result format for one task invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub kind: OutcomeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TaskOutcome {
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            artifacts: Vec::new(),
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failure,
            artifacts: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }
}
