// src/dag/scheduler.rs

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::dag::graph::{DagGraph, NodeId};
use crate::dag::node_state::{NodeInfo, NodeOutcome, NodeRunState, RunState};
use crate::dag::scheduler_step::SchedulerStep;
use crate::engine::report::{ExecutionReport, FailedNode};

/// Pure, synchronous state machine behind the executor.
///
/// It is responsible for:
/// - counting unmet dependencies per node
/// - deciding when a node becomes `Ready`
/// - making `Ready -> Running` exclusive per node
/// - recording the first failure exactly once and refusing further dispatch
///
/// There are no channels, no Tokio types and no IO in here. The async
/// coordinator in [`crate::engine::runtime`] is its only owner, which
/// serializes every mutation.
#[derive(Debug)]
pub struct Scheduler {
    nodes: BTreeMap<NodeId, NodeInfo>,
    started: bool,
    running: usize,
    cancelled: bool,
    interrupted: bool,
    first_failure: Option<FailedNode>,
}

impl Scheduler {
    /// Build the state table from `graph`, reading each edge as
    /// "source must succeed before target starts".
    pub fn new(graph: &DagGraph) -> Self {
        let mut nodes: BTreeMap<NodeId, NodeInfo> = BTreeMap::new();

        for edge in graph.edges() {
            nodes
                .entry(edge.source.clone())
                .or_insert_with(NodeInfo::new)
                .dependents
                .push(edge.target.clone());
            nodes
                .entry(edge.target.clone())
                .or_insert_with(NodeInfo::new)
                .unmet += 1;
        }

        Self {
            nodes,
            started: false,
            running: 0,
            cancelled: false,
            interrupted: false,
            first_failure: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of actions currently in flight.
    pub fn running_count(&self) -> usize {
        self.running
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn first_failure(&self) -> Option<&FailedNode> {
        self.first_failure.as_ref()
    }

    /// Read-only view of the given node's state.
    pub fn state_of(&self, node: &str) -> Option<NodeRunState> {
        self.nodes.get(node).map(|info| info.state.into())
    }

    pub fn all_succeeded(&self) -> bool {
        self.nodes
            .values()
            .all(|info| info.state == RunState::Succeeded)
    }

    /// Nothing is in flight and nothing more will be dispatched.
    pub fn is_finished(&self) -> bool {
        self.running == 0 && (self.cancelled || self.all_succeeded())
    }

    /// Mark every node without dependencies as `Ready`.
    ///
    /// Calling this more than once is a no-op.
    pub fn start(&mut self) -> SchedulerStep {
        if self.started {
            warn!("scheduler: start called twice; ignoring");
            return SchedulerStep::default();
        }
        self.started = true;

        let mut newly_ready = Vec::new();
        for (name, info) in self.nodes.iter_mut() {
            if info.unmet == 0 && info.state == RunState::Pending {
                info.state = RunState::Ready;
                newly_ready.push(name.clone());
            }
        }

        info!(
            nodes = self.nodes.len(),
            ready = newly_ready.len(),
            "scheduler: run started"
        );

        SchedulerStep {
            newly_ready,
            cancel_requested: false,
            run_just_finished: self.is_finished(),
        }
    }

    /// Exclusive `Ready -> Running` transition.
    ///
    /// Returns `false` (and changes nothing) if the run is cancelled or the
    /// node is not `Ready`, so a node can never be dispatched twice.
    pub fn mark_running(&mut self, node: &str) -> bool {
        if self.cancelled {
            debug!(node = %node, "run cancelled; refusing dispatch");
            return false;
        }

        match self.nodes.get_mut(node) {
            Some(info) if info.state == RunState::Ready => {
                info.state = RunState::Running;
                self.running += 1;
                debug!(node = %node, running = self.running, "node marked Running");
                true
            }
            Some(info) => {
                warn!(node = %node, state = ?info.state, "dispatch of node that is not Ready; ignoring");
                false
            }
            None => {
                warn!(node = %node, "dispatch of unknown node; ignoring");
                false
            }
        }
    }

    /// Record the outcome of a `Running` node and release its dependents.
    pub fn complete(&mut self, node: &str, outcome: NodeOutcome) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        // Nothing asked the action to stop, so a Cancelled outcome counts
        // against it.
        let outcome = match outcome {
            NodeOutcome::Cancelled if !self.cancelled => NodeOutcome::Failed(
                "action stopped as cancelled but no cancellation was requested".to_string(),
            ),
            other => other,
        };

        let dependents = match self.nodes.get_mut(node) {
            Some(info) if info.state == RunState::Running => {
                self.running -= 1;
                match outcome {
                    NodeOutcome::Success => {
                        info.state = RunState::Succeeded;
                        debug!(node = %node, "node succeeded");
                        info.dependents.clone()
                    }
                    NodeOutcome::Failed(cause) => {
                        info.state = RunState::Failed;
                        info.failure = Some(cause.clone());
                        warn!(node = %node, cause = %cause, "node failed");
                        if self.first_failure.is_none() {
                            self.first_failure = Some(FailedNode {
                                node: node.to_string(),
                                cause,
                            });
                            if !self.cancelled {
                                self.cancelled = true;
                                step.cancel_requested = true;
                                info!(node = %node, "first failure recorded; cancelling run");
                            }
                        }
                        Vec::new()
                    }
                    NodeOutcome::Cancelled => {
                        info.state = RunState::Cancelled;
                        debug!(node = %node, "node stopped after cancellation");
                        Vec::new()
                    }
                }
            }
            Some(info) => {
                warn!(node = %node, state = ?info.state, "completion for node that is not Running; ignoring");
                return step;
            }
            None => {
                warn!(node = %node, "completion for unknown node; ignoring");
                return step;
            }
        };

        for dependent in dependents {
            if let Some(info) = self.nodes.get_mut(&dependent) {
                info.unmet = info.unmet.saturating_sub(1);
                if info.unmet == 0 && info.state == RunState::Pending && !self.cancelled {
                    info.state = RunState::Ready;
                    debug!(node = %dependent, "all dependencies succeeded; marked Ready");
                    step.newly_ready.push(dependent);
                }
            }
        }

        step.run_just_finished = self.is_finished();
        step
    }

    /// Stop dispatching without recording a failure (e.g. Ctrl-C).
    ///
    /// Returns `true` if this call performed the cancellation.
    pub fn interrupt(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        self.interrupted = true;
        info!("scheduler: run interrupted");
        true
    }

    /// Snapshot of the run for reporting.
    pub fn report(&self) -> ExecutionReport {
        let mut report = ExecutionReport {
            first_failure: self.first_failure.clone(),
            interrupted: self.interrupted,
            ..ExecutionReport::default()
        };

        for (name, info) in &self.nodes {
            match info.state {
                RunState::Succeeded => report.succeeded.push(name.clone()),
                RunState::Failed => report.failed.push(FailedNode {
                    node: name.clone(),
                    cause: info.failure.clone().unwrap_or_default(),
                }),
                RunState::Cancelled => report.cancelled.push(name.clone()),
                RunState::Running => report.running.push(name.clone()),
                RunState::Pending | RunState::Ready => report.not_attempted.push(name.clone()),
            }
        }

        report
    }
}
