// src/exec/backend.rs

//! Pluggable action invoker abstraction.
//!
//! The executor talks to an [`ActionInvoker`] instead of spawning processes
//! itself. Production code uses [`ShellInvoker`]; tests provide their own
//! implementation that records timings and never touches the OS.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::dag::NodeOutcome;
use crate::exec::cancel::CancelToken;
use crate::exec::task_runner::run_shell_action;
use crate::paths::base_name;

/// How an action invocation ended, from the invoker's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Success,
    Failed(String),
    /// The action saw the cancellation signal and stopped.
    Cancelled,
}

/// Status plus whatever output the action produced.
///
/// The executor only looks at `status`; `output` is opaque to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub status: ActionStatus,
    pub output: String,
}

impl ActionOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Success,
            output: output.into(),
        }
    }

    pub fn failed(reason: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Failed(reason.into()),
            output: output.into(),
        }
    }

    pub fn cancelled(output: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Cancelled,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }
}

impl From<&ActionOutcome> for NodeOutcome {
    fn from(outcome: &ActionOutcome) -> Self {
        match &outcome.status {
            ActionStatus::Success => NodeOutcome::Success,
            ActionStatus::Failed(reason) => NodeOutcome::Failed(reason.clone()),
            ActionStatus::Cancelled => NodeOutcome::Cancelled,
        }
    }
}

pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = ActionOutcome> + Send + 'a>>;

/// Trait abstracting how the action for one node is run.
///
/// The implementation is free to:
/// - spawn OS processes (production)
/// - sleep, record timestamps and return canned outcomes (tests)
///
/// It should watch `cancel` and stop early when it fires.
pub trait ActionInvoker: Send + Sync + 'static {
    fn invoke<'a>(&'a self, node: &'a str, cancel: CancelToken) -> ActionFuture<'a>;
}

/// Runs one shell command with each node directory as working directory.
#[derive(Debug, Clone)]
pub struct ShellInvoker {
    command: String,
    shell: Option<String>,
    echo_output: bool,
}

impl ShellInvoker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            shell: None,
            echo_output: true,
        }
    }

    /// Use `<shell> -c <command>` instead of the platform default.
    pub fn with_shell(mut self, shell: Option<String>) -> Self {
        self.shell = shell;
        self
    }

    /// Print each node's captured output to stdout when it finishes.
    pub fn with_echo_output(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl ActionInvoker for ShellInvoker {
    fn invoke<'a>(&'a self, node: &'a str, cancel: CancelToken) -> ActionFuture<'a> {
        Box::pin(async move {
            let dir = Path::new(node);
            let label = base_name(dir);

            if self.echo_output {
                println!("[tforder] Running in {node}: {}", self.command);
            }

            let outcome = run_shell_action(&self.command, self.shell.as_deref(), dir, cancel).await;

            if self.echo_output {
                print!("[{label}] Output:\n{}", outcome.output);
                match &outcome.status {
                    ActionStatus::Success => {}
                    ActionStatus::Failed(reason) => println!("[{label}] Error: {reason}"),
                    ActionStatus::Cancelled => println!("[{label}] Cancelled"),
                }
            }

            outcome
        })
    }
}
