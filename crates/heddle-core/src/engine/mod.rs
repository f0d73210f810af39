//! Engine layer: task contracts, capability dispatch, invocation records,
//! and the execution driver.

pub mod builder;
pub mod executor;
pub mod invocation;
pub mod registry;
pub mod task;
pub mod worker;

pub use self::builder::{BuildError, EngineBuilder};
pub use self::executor::ExecutionEngine;
pub use self::invocation::{InvocationCounts, InvocationRecord, InvocationStatus};
pub use self::registry::TaskRegistry;
pub use self::task::{BuildTask, ConcurrentTask, TaskDeclaration, TaskFactory};
pub use self::worker::WorkerGroup;
