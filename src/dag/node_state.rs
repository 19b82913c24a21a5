// src/dag/node_state.rs

//! Per-node execution state tracked by the [`Scheduler`](super::Scheduler).

use crate::dag::graph::NodeId;

/// Per-run state of a node (internal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    /// Waiting for at least one dependency to succeed.
    Pending,
    /// All dependencies succeeded; waiting for a free worker.
    Ready,
    /// Handed to a worker; the action is in flight.
    Running,
    Succeeded,
    Failed,
    /// The action was in flight when the run was cancelled and stopped early.
    Cancelled,
}

/// Public, read-only view of a node's state.
///
/// Exposed for tests and diagnostics without leaking the internal
/// `RunState` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRunState {
    Pending,
    Ready,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl From<RunState> for NodeRunState {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Pending => NodeRunState::Pending,
            RunState::Ready => NodeRunState::Ready,
            RunState::Running => NodeRunState::Running,
            RunState::Succeeded => NodeRunState::Succeeded,
            RunState::Failed => NodeRunState::Failed,
            RunState::Cancelled => NodeRunState::Cancelled,
        }
    }
}

/// Scheduling bookkeeping for one node.
#[derive(Debug, Clone)]
pub(crate) struct NodeInfo {
    pub(crate) state: RunState,
    /// Dependencies that have not succeeded yet.
    pub(crate) unmet: usize,
    /// Nodes that list this one as a dependency.
    pub(crate) dependents: Vec<NodeId>,
    /// Failure cause reported by the action, if it failed.
    pub(crate) failure: Option<String>,
}

impl NodeInfo {
    pub(crate) fn new() -> Self {
        Self {
            state: RunState::Pending,
            unmet: 0,
            dependents: Vec::new(),
            failure: None,
        }
    }
}

/// Result reported back to the scheduler once a node's action has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    Success,
    Failed(String),
    /// The action observed cancellation and stopped before finishing.
    Cancelled,
}
