//! Task registry (name -> factory).

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{HeddleError, TaskName};

use super::task::TaskFactory;

/// Registry of task factories.
///
/// Design:
/// - Built during initialization (mutable).
/// - Used during runtime (immutable).
/// This avoids locks and keeps lookup on the execution path trivial.
#[derive(Default)]
pub struct TaskRegistry {
    factories: HashMap<TaskName, Arc<dyn TaskFactory>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for a task name. Double registration is an
    /// error; if you want "last wins", change this to overwrite instead.
    pub fn register(
        &mut self,
        name: TaskName,
        factory: Arc<dyn TaskFactory>,
    ) -> Result<(), HeddleError> {
        if self.factories.contains_key(&name) {
            return Err(HeddleError::DuplicateTask(name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn get(&self, name: &TaskName) -> Option<&Arc<dyn TaskFactory>> {
        self.factories.get(name)
    }

    pub fn registered_names(&self) -> Vec<TaskName> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
