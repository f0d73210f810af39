//! ExecutionEngine: per-invocation environment construction and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{
    HeddleError, InvocationId, InvocationState, TaskOutcome, WorkRequest,
};
use crate::env::TaskEnvironment;
use crate::ports::{Clock, IdGenerator, IsolatedTaskHost};

use super::invocation::{InvocationCounts, InvocationRecord, InvocationStatus};
use super::registry::TaskRegistry;
use super::task::TaskDeclaration;

/// The engine-side owner of the isolation contract.
///
/// For every invocation it builds a fresh [`TaskEnvironment`] seeded with
/// the request's resolved project directory and a private copy of the
/// variable snapshot, injects it (interface-capable tasks only), and then
/// invokes the entry point. Distinct invocations share no mutable
/// construction-time state (only the immutable base snapshot behind an
/// `Arc`), so constructing environments concurrently needs no
/// synchronization.
pub struct ExecutionEngine {
    registry: TaskRegistry,
    base_vars: Arc<HashMap<String, String>>,

    /// All invocation records (single source of truth).
    records: Mutex<HashMap<InvocationId, InvocationRecord>>,

    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    task_host: Arc<dyn IsolatedTaskHost>,
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine").finish_non_exhaustive()
    }
}

impl ExecutionEngine {
    pub(crate) fn new(
        registry: TaskRegistry,
        base_vars: Arc<HashMap<String, String>>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        task_host: Arc<dyn IsolatedTaskHost>,
    ) -> Self {
        Self {
            registry,
            base_vars,
            records: Mutex::new(HashMap::new()),
            clock,
            ids,
            task_host,
        }
    }

    /// Run one work request to a terminal state.
    ///
    /// Returns the invocation id with the execution result; the record is
    /// also queryable afterwards via [`ExecutionEngine::status`].
    pub async fn execute(&self, request: WorkRequest) -> (InvocationId, Result<TaskOutcome, HeddleError>) {
        let invocation_id = self.ids.next_invocation_id();
        let result = self.run_invocation(invocation_id, &request).await;
        (invocation_id, result)
    }

    async fn run_invocation(
        &self,
        invocation_id: InvocationId,
        request: &WorkRequest,
    ) -> Result<TaskOutcome, HeddleError> {
        let factory = self
            .registry
            .get(request.task_name())
            .cloned()
            .ok_or_else(|| HeddleError::TaskNotFound(request.task_name().clone()))?;

        // Fresh instance per invocation: a retry constructs a new
        // declaration and a new environment, never reuses either.
        let declaration = factory.create(request.payload().clone())?;
        let capability = declaration.capability();

        {
            let mut records = self.records.lock().await;
            records.insert(
                invocation_id,
                InvocationRecord::new(
                    invocation_id,
                    request.task_id(),
                    request.task_name().clone(),
                    capability,
                    self.clock.now(),
                ),
            );
        }

        let outcome = match declaration {
            TaskDeclaration::Concurrent(mut task) => {
                let environment = TaskEnvironment::new(
                    request.project_directory().clone(),
                    Arc::clone(&self.base_vars),
                );
                self.with_record(invocation_id, |rec, now| rec.mark_environment_assigned(now))
                    .await?;
                task.assign_environment(environment);
                self.with_record(invocation_id, |rec, now| rec.mark_executing(now))
                    .await?;
                task.execute().await
            }
            TaskDeclaration::Marker(mut task) => {
                // 信頼ベース: slot が無いので環境は注入しない
                self.with_record(invocation_id, |rec, now| rec.mark_executing(now))
                    .await?;
                task.execute().await
            }
            TaskDeclaration::Legacy(_) => {
                // The in-process instance only carried the declaration; the
                // isolated host runs its own copy in a worker process.
                self.with_record(invocation_id, |rec, now| rec.mark_executing(now))
                    .await?;
                self.task_host.run(request).await
            }
        };

        match outcome {
            Ok(outcome) => {
                self.with_record(invocation_id, |rec, now| {
                    rec.mark_completed(outcome.clone(), now)
                })
                .await?;
                Ok(outcome)
            }
            Err(err) => {
                let message = err.to_string();
                self.with_record(invocation_id, |rec, now| rec.mark_faulted(message, now))
                    .await?;
                Err(err)
            }
        }
    }

    async fn with_record<F>(&self, invocation_id: InvocationId, f: F) -> Result<(), HeddleError>
    where
        F: FnOnce(&mut InvocationRecord, DateTime<Utc>) -> Result<(), HeddleError>,
    {
        let now = self.clock.now();
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(&invocation_id)
            .ok_or_else(|| HeddleError::Other(format!("no record for {invocation_id}")))?;
        f(record, now)
    }

    pub async fn status(&self, invocation_id: InvocationId) -> Option<InvocationStatus> {
        let records = self.records.lock().await;
        records.get(&invocation_id).map(InvocationRecord::status)
    }

    /// All invocation views, oldest first (ULIDs sort by creation time).
    pub async fn statuses(&self) -> Vec<InvocationStatus> {
        let records = self.records.lock().await;
        let mut statuses: Vec<InvocationStatus> =
            records.values().map(InvocationRecord::status).collect();
        statuses.sort_by_key(|status| status.invocation_id);
        statuses
    }

    /// Counts by state for observability.
    pub async fn counts(&self) -> InvocationCounts {
        let records = self.records.lock().await;
        let mut counts = InvocationCounts::default();
        for record in records.values() {
            match record.state {
                InvocationState::NotStarted => counts.not_started += 1,
                InvocationState::EnvironmentAssigned => counts.environment_assigned += 1,
                InvocationState::Executing => counts.executing += 1,
                InvocationState::Completed => counts.completed += 1,
                InvocationState::Faulted => counts.faulted += 1,
            }
        }
        counts
    }
}
