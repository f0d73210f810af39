use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::AbsolutePath;

use super::TaskId;

/// Name a task implementation is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskName(String);

impl TaskName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One unit of work handed to the engine.
///
/// `project_directory` is resolved by the engine's caller and becomes the
/// logical current directory of the invocation's TaskEnvironment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRequest {
    task_id: TaskId,
    task_name: TaskName,
    payload: serde_json::Value,
    project_directory: AbsolutePath,
}

impl WorkRequest {
    pub fn new(
        task_id: TaskId,
        task_name: TaskName,
        payload: serde_json::Value,
        project_directory: AbsolutePath,
    ) -> Self {
        Self {
            task_id,
            task_name,
            payload,
            project_directory,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn task_name(&self) -> &TaskName {
        &self.task_name
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn project_directory(&self) -> &AbsolutePath {
        &self.project_directory
    }
}
