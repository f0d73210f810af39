use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;

use heddle_core::domain::{Artifact, HeddleError, TaskName, TaskOutcome, WorkRequest};
use heddle_core::engine::{
    BuildTask, ConcurrentTask, EngineBuilder, TaskDeclaration, WorkerGroup,
};
use heddle_core::env::TaskEnvironment;
use heddle_core::path::{AbsolutePath, PathPlatform};
use heddle_core::ports::{IdGenerator, SystemClock, UlidGenerator};

#[derive(Debug, Deserialize)]
struct EmitPayload {
    /// Relative output path; resolved through the task's own environment.
    output: String,
    configuration: String,
}

/// Interface-capable task: receives a TaskEnvironment before execute().
struct EmitTask {
    payload: EmitPayload,
    environment: Option<TaskEnvironment>,
}

#[async_trait]
impl BuildTask for EmitTask {
    async fn execute(&mut self) -> Result<TaskOutcome, HeddleError> {
        let Some(environment) = self.environment.as_mut() else {
            return Err(HeddleError::Other("environment was not assigned".to_string()));
        };

        // 相対パスは必ず自分の論理ディレクトリで解決する（プロセスの
        // カレントディレクトリは一切見ない）
        let output = environment.absolute_path(&self.payload.output).canonical_form();
        environment.set_var("EMIT_CONFIGURATION", Some(self.payload.configuration.as_str()));

        // 子プロセスを起動するならこの構成を使う（親の実環境は継承しない）
        let start_info = environment.process_start_info("ilasm").arg(output.as_str());
        println!(
            "[emit] {} (configuration={}, child cwd={})",
            output,
            self.payload.configuration,
            start_info.working_directory()
        );

        Ok(TaskOutcome::success().with_artifact(Artifact::FilePath(output.value().to_string())))
    }
}

impl ConcurrentTask for EmitTask {
    fn assign_environment(&mut self, environment: TaskEnvironment) {
        self.environment = Some(environment);
    }
}

/// Marker-capable task: no slot, pure computation, trusted not to touch
/// process globals.
struct StampTask;

#[async_trait]
impl BuildTask for StampTask {
    async fn execute(&mut self) -> Result<TaskOutcome, HeddleError> {
        println!("[stamp] computing build stamp");
        Ok(TaskOutcome::success())
    }
}

/// Legacy task: would need the out-of-process host; the default engine
/// refuses it, which is the point of the demo.
struct LegacyCopyTask;

#[async_trait]
impl BuildTask for LegacyCopyTask {
    async fn execute(&mut self) -> Result<TaskOutcome, HeddleError> {
        Ok(TaskOutcome::success())
    }
}

fn project_dir(name: &str) -> AbsolutePath {
    let root = match PathPlatform::NATIVE {
        PathPlatform::Windows => r"C:\work",
        PathPlatform::Posix => "/work",
    };
    let sep = PathPlatform::NATIVE.primary_separator();
    AbsolutePath::new(format!("{root}{sep}{name}")).expect("project dir is rooted")
}

#[tokio::main]
async fn main() {
    // (A) エンジンを構築（fail-fast: 期待タスクを宣言しておく）
    let engine = Arc::new(
        EngineBuilder::new()
            .register(
                TaskName::new("emit"),
                Arc::new(|payload: serde_json::Value| {
                    let payload: EmitPayload = serde_json::from_value(payload)
                        .map_err(|e| HeddleError::Other(format!("json decode: {e}")))?;
                    Ok(TaskDeclaration::Concurrent(Box::new(EmitTask {
                        payload,
                        environment: None,
                    })))
                }),
            )
            .expect("register emit")
            .register(
                TaskName::new("stamp"),
                Arc::new(|_payload: serde_json::Value| {
                    Ok(TaskDeclaration::Marker(Box::new(StampTask)))
                }),
            )
            .expect("register stamp")
            .register(
                TaskName::new("legacy-copy"),
                Arc::new(|_payload: serde_json::Value| {
                    Ok(TaskDeclaration::Legacy(Box::new(LegacyCopyTask)))
                }),
            )
            .expect("register legacy-copy")
            .expect_tasks(&["emit", "stamp", "legacy-copy"])
            .build()
            .expect("engine builds"),
    );

    // (B) ワーカーを起動（今回は 2 本）
    let (tx, rx) = mpsc::channel(8);
    let workers = WorkerGroup::spawn(2, Arc::clone(&engine), rx);

    // (C) タスク投入: 同じ "emit" を別プロジェクトで並行実行しても、
    //     それぞれの invocation が自分の論理ディレクトリで解決する
    let ids = UlidGenerator::new(SystemClock);
    for (project, configuration) in [("app", "Debug"), ("lib", "Release"), ("tests", "Debug")] {
        let request = WorkRequest::new(
            ids.next_task_id(),
            TaskName::new("emit"),
            serde_json::json!({ "output": "out/a.dll", "configuration": configuration }),
            project_dir(project),
        );
        tx.send(request).await.expect("queue accepts work");
    }
    tx.send(WorkRequest::new(
        ids.next_task_id(),
        TaskName::new("stamp"),
        serde_json::json!({}),
        project_dir("app"),
    ))
    .await
    .expect("queue accepts work");

    // legacy タスクは in-process では実行されない（DenyingTaskHost が拒否し、
    // worker が faulted を報告する）
    tx.send(WorkRequest::new(
        ids.next_task_id(),
        TaskName::new("legacy-copy"),
        serde_json::json!({}),
        project_dir("app"),
    ))
    .await
    .expect("queue accepts work");

    // (D) チャネルを閉じてワーカーの完走を待つ
    drop(tx);
    workers.join().await;

    // (E) 結果を表示
    for status in engine.statuses().await {
        println!(
            "{} task={} capability={:?} state={:?}",
            status.invocation_id, status.task_name, status.capability, status.state
        );
    }
    println!("counts: {:?}", engine.counts().await);

    // (F) 隔離のデモ: 片方の set_var は相手にも実プロセスにも見えない
    let shared = Arc::new(HashMap::new());
    let mut a = TaskEnvironment::new(project_dir("a"), Arc::clone(&shared));
    let b = TaskEnvironment::new(project_dir("b"), shared);
    a.set_var("X", Some("1"));
    println!(
        "isolation: a.X={:?} b.X={:?} process.X={:?}",
        a.var("X"),
        b.var("X"),
        std::env::var("X").ok()
    );
}
