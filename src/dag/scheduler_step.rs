// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::graph::NodeId;

/// Structured result of a single scheduler "step".
///
/// Tests use this to step the DAG by hand and assert on what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStep {
    /// Nodes that became `Ready` as a result of this step, in the order
    /// their dependency counts reached zero.
    pub newly_ready: Vec<NodeId>,
    /// Set when this step recorded the run's first failure. The caller must
    /// raise the cancellation signal.
    pub cancel_requested: bool,
    /// Whether nothing is in flight any more and nothing else will be
    /// dispatched.
    pub run_just_finished: bool,
}
