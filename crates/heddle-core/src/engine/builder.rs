//! EngineBuilder - エンジンの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - expect_tasks() で期待される task 名を宣言
//! - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す（起動時に気づける）

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{HeddleError, TaskName};
use crate::ports::{Clock, DenyingTaskHost, IdGenerator, IsolatedTaskHost, SystemClock, UlidGenerator};

use super::executor::ExecutionEngine;
use super::registry::TaskRegistry;
use super::task::TaskFactory;

/// EngineBuilder はエンジンを構築
///
/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .register(TaskName::new("emit"), factory)?
///     .expect_tasks(&["emit"])
///     .build()?;
/// ```
pub struct EngineBuilder {
    registry: TaskRegistry,
    expected_tasks: Option<Vec<TaskName>>,

    /// None のときは build() でプロセス環境をスナップショットする
    base_vars: Option<HashMap<String, String>>,

    clock: Arc<dyn Clock>,
    ids: Option<Arc<dyn IdGenerator>>,
    task_host: Arc<dyn IsolatedTaskHost>,
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder").finish_non_exhaustive()
    }
}

/// BuildError はエンジン構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing task names: {0:?}. These tasks were expected but not registered.")]
    MissingTaskNames(Vec<String>),
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            registry: TaskRegistry::new(),
            expected_tasks: None,
            base_vars: None,
            clock: Arc::new(SystemClock),
            ids: None,
            task_host: Arc::new(DenyingTaskHost),
        }
    }

    /// Factory を登録（二重登録はエラー）
    pub fn register(
        mut self,
        name: TaskName,
        factory: Arc<dyn TaskFactory>,
    ) -> Result<Self, HeddleError> {
        self.registry.register(name, factory)?;
        Ok(self)
    }

    /// 期待される task 名のリストを設定
    pub fn expect_tasks(mut self, names: &[&str]) -> Self {
        self.expected_tasks = Some(names.iter().map(|&n| TaskName::new(n)).collect());
        self
    }

    /// Seed the variable snapshot explicitly (tests, hermetic builds).
    /// Without this, build() snapshots the real process environment once.
    pub fn base_environment(mut self, vars: HashMap<String, String>) -> Self {
        self.base_vars = Some(vars);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Legacy タスクの隔離実行ホストを差し替える
    pub fn task_host(mut self, host: Arc<dyn IsolatedTaskHost>) -> Self {
        self.task_host = host;
        self
    }

    /// 検証してエンジンを生成
    pub fn build(self) -> Result<ExecutionEngine, BuildError> {
        if let Some(expected) = &self.expected_tasks {
            let registered = self.registry.registered_names();
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !registered.contains(name))
                .map(|name| name.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingTaskNames(missing));
            }
        }

        let base_vars = Arc::new(
            self.base_vars
                .unwrap_or_else(|| std::env::vars().collect()),
        );
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));

        Ok(ExecutionEngine::new(
            self.registry,
            base_vars,
            self.clock,
            ids,
            self.task_host,
        ))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
