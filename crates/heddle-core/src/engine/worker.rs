//! Worker group: drives work requests through the engine concurrently.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::domain::WorkRequest;

use super::executor::ExecutionEngine;

/// Worker group handle.
/// - `request_shutdown()` でワーカー全体が止まる（実行中の invocation は完走）
/// - `shutdown_and_join()` で全ワーカーの終了を待てる
pub struct WorkerGroup {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl WorkerGroup {
    /// Spawn `n` workers feeding from `requests`.
    ///
    /// Workers also stop on their own when the request channel closes
    /// (all senders dropped).
    pub fn spawn(
        n: usize,
        engine: Arc<ExecutionEngine>,
        requests: mpsc::Receiver<WorkRequest>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let requests = Arc::new(Mutex::new(requests));

        let mut joins = Vec::with_capacity(n);
        for worker_id in 0..n {
            let engine = Arc::clone(&engine);
            let requests = Arc::clone(&requests);
            let mut shutdown = shutdown_rx.clone();

            let join = tokio::spawn(async move {
                worker_loop(worker_id, engine, requests, &mut shutdown).await;
            });
            joins.push(join);
        }

        Self { shutdown_tx, joins }
    }

    /// Request shutdown for all workers.
    /// This does not cancel in-flight invocations; it just stops taking
    /// new requests.
    pub fn request_shutdown(&self) {
        // ignore send error: receivers may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all workers to stop on their own (request channel closed).
    pub async fn join(self) {
        for join in self.joins {
            let _ = join.await;
        }
    }

    /// Shutdown and wait for all workers.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        self.join().await;
    }
}

async fn worker_loop(
    worker_id: usize,
    engine: Arc<ExecutionEngine>,
    requests: Arc<Mutex<mpsc::Receiver<WorkRequest>>>,
    shutdown: &mut watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        // 受信待ちは shutdown と競合させる。
        // ロックは recv の間だけ保持し、実行中は他のワーカーに渡す。
        let request = {
            let mut rx = requests.lock().await;
            tokio::select! {
                _ = shutdown.changed() => {
                    continue;
                }
                request = rx.recv() => request,
            }
        };

        let Some(request) = request else {
            break; // channel closed: submitters are done
        };

        let (invocation_id, result) = engine.execute(request).await;
        if let Err(err) = result {
            eprintln!("[worker-{worker_id}] invocation {invocation_id} faulted: {err}");
        }
    }
}
