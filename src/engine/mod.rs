// src/engine/mod.rs

//! Dependency-aware execution engine for tforder.
//!
//! This module ties together:
//! - the pure DAG [`Scheduler`](crate::dag::Scheduler), owned by a single
//!   coordinator task
//! - a fixed pool of worker tasks that run actions through an
//!   [`ActionInvoker`](crate::exec::ActionInvoker)
//! - the cancellation signal raised on the first failure (or Ctrl-C)
//!
//! The async shell lives in [`runtime`]; the run summary in [`report`].

/// Options shared by the executor and its callers.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorOptions {
    /// Maximum number of actions running at the same time. Must be >= 1.
    pub max_parallel: usize,
    /// If true, Ctrl-C stops further dispatch and cancels in-flight actions.
    pub handle_ctrl_c: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            max_parallel: 2,
            handle_ctrl_c: false,
        }
    }
}

pub mod report;
pub mod runtime;

pub use report::{ExecutionReport, FailedNode};
pub use runtime::Executor;
