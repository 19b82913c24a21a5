// src/engine/report.rs

//! Summary of one executor run.

use tracing::{info, warn};

use crate::dag::NodeId;
use crate::errors::{Result, TfOrderError};

/// A node whose action reported failure, with the reported cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedNode {
    pub node: NodeId,
    pub cause: String,
}

/// Final state of every node after the executor returns.
///
/// All lists are sorted by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub succeeded: Vec<NodeId>,
    /// Every node whose action failed. Only `first_failure` is surfaced as
    /// the run's error.
    pub failed: Vec<FailedNode>,
    /// In-flight actions that stopped because of the cancellation signal.
    pub cancelled: Vec<NodeId>,
    /// Nodes that were never dispatched.
    pub not_attempted: Vec<NodeId>,
    /// Only non-empty if the report was taken before the run drained.
    pub running: Vec<NodeId>,
    pub first_failure: Option<FailedNode>,
    /// The run was stopped from outside (Ctrl-C) rather than by a failure.
    pub interrupted: bool,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.first_failure.is_none()
            && !self.interrupted
            && self.failed.is_empty()
            && self.cancelled.is_empty()
            && self.not_attempted.is_empty()
            && self.running.is_empty()
    }

    /// Emit one log line per outcome bucket.
    pub fn log_summary(&self) {
        info!(
            succeeded = self.succeeded.len(),
            failed = self.failed.len(),
            cancelled = self.cancelled.len(),
            not_attempted = self.not_attempted.len(),
            "execution finished"
        );
        if let Some(failure) = &self.first_failure {
            warn!(node = %failure.node, cause = %failure.cause, "first failure");
        }
        if !self.not_attempted.is_empty() {
            warn!(nodes = ?self.not_attempted, "not attempted");
        }
    }

    /// `Ok(())` if every node succeeded, otherwise the single error that
    /// describes the run.
    pub fn into_result(self) -> Result<()> {
        if let Some(failure) = self.first_failure {
            return Err(TfOrderError::ActionFailed {
                node: failure.node,
                cause: failure.cause,
            });
        }
        if self.interrupted {
            return Err(TfOrderError::Interrupted);
        }
        Ok(())
    }
}
