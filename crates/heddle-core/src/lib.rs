//! heddle-core
//!
//! Per-task environment isolation for a concurrent build engine.
//!
//! 複数のタスクを 1 プロセス内で並行実行すると、プロセス全体で共有される
//! 可変状態（カレントディレクトリ・環境変数）が暗黙の競合点になります。
//! heddle はこの「ambient な global 参照」を、invocation ごとに明示的に
//! 受け渡すコンテキスト（TaskEnvironment）に置き換えます。
//!
//! # モジュール構成
//! - **path**: 検証済み絶対パス値（AbsolutePath）と正規化スキャナ
//! - **env**: タスク専用の論理環境（TaskEnvironment / ProcessStartInfo）
//! - **engine**: capability 宣言と実行ドライバ（ExecutionEngine / WorkerGroup）
//! - **domain**: ドメインモデル（ids, capability, state, outcome, errors）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, IsolatedTaskHost）
//! - **contract**: 静的解析向けポリシー（UnsafeOperation）
//!
//! # 隔離の保証範囲
//! 保証されるのは「別々の invocation の間」の隔離です。ひとつのタスクが
//! 自分で立てたスレッド間で同じ TaskEnvironment を共有する場合の同期は
//! タスク作者の責任です（この型は内部で同期しません）。

pub mod contract;
pub mod domain;
pub mod engine;
pub mod env;
pub mod path;
pub mod ports;

// 主要な型を再エクスポート
pub use domain::{HeddleError, InvocationState, TaskCapability, TaskName, TaskOutcome, WorkRequest};
pub use engine::{EngineBuilder, ExecutionEngine, WorkerGroup};
pub use env::{ProcessStartInfo, TaskEnvironment};
pub use path::{AbsolutePath, PathPlatform};
