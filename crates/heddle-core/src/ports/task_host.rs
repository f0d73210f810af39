//! IsolatedTaskHost port - legacy タスクの隔離実行

use async_trait::async_trait;

use crate::domain::{HeddleError, TaskOutcome, WorkRequest};

/// Runs a not-capable task outside the shared engine process.
///
/// In-process discipline cannot be trusted for legacy tasks, so the real
/// engine hands them to a dedicated worker process and gets OS-level
/// isolation instead. That transport is an external collaborator; the core
/// only defines the seam.
#[async_trait]
pub trait IsolatedTaskHost: Send + Sync {
    async fn run(&self, request: &WorkRequest) -> Result<TaskOutcome, HeddleError>;
}

/// Placeholder host: refuses every request.
///
/// Callers must not depend on legacy execution silently succeeding when no
/// real host is wired in.
pub struct DenyingTaskHost;

#[async_trait]
impl IsolatedTaskHost for DenyingTaskHost {
    async fn run(&self, _request: &WorkRequest) -> Result<TaskOutcome, HeddleError> {
        Err(HeddleError::NotSupported(
            "legacy task execution requires an out-of-process task host",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, TaskName};
    use crate::path::AbsolutePath;
    use ulid::Ulid;

    #[tokio::test]
    async fn denying_host_fails_with_not_supported() {
        let host = DenyingTaskHost;
        let request = WorkRequest::new(
            TaskId::from_ulid(Ulid::new()),
            TaskName::new("legacy-copy"),
            serde_json::json!({}),
            AbsolutePath::empty(),
        );

        let err = host.run(&request).await.unwrap_err();
        assert!(matches!(err, HeddleError::NotSupported(_)));
    }
}
