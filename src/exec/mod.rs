// src/exec/mod.rs

//! Action execution layer.
//!
//! This module actually runs the configured command in each stack directory,
//! using `tokio::process::Command`, and reports the outcome back to the
//! executor.
//!
//! - [`backend`] provides the `ActionInvoker` trait and the concrete
//!   `ShellInvoker` used in production, which tests replace with a fake.
//! - [`task_runner`] handles a single shell process: spawn, output capture,
//!   cancellation.
//! - [`cancel`] holds the one-shot cancellation signal and its tokens.

pub mod backend;
pub mod cancel;
pub mod task_runner;

pub use backend::{ActionFuture, ActionInvoker, ActionOutcome, ActionStatus, ShellInvoker};
pub use cancel::{CancelSignal, CancelToken};
pub use task_runner::run_shell_action;
