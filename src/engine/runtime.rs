// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::dag::{DagGraph, NodeId, NodeOutcome, Scheduler, SchedulerStep, topo_order};
use crate::errors::{Result, TfOrderError};
use crate::exec::{ActionInvoker, ActionOutcome, CancelSignal, CancelToken};
use crate::types::Direction;

use super::ExecutorOptions;
use super::report::ExecutionReport;

/// Completion event sent by a worker after running one node.
#[derive(Debug)]
struct WorkerEvent {
    worker: usize,
    node: NodeId,
    outcome: ActionOutcome,
}

/// Runs an action once per node of a [`DagGraph`], respecting its edges.
///
/// The coordinator (the future returned by [`Executor::run`]) is the only
/// owner of the [`Scheduler`]: completion events from the workers arrive
/// over a channel and are applied one at a time. A fixed pool of
/// `max_parallel` workers exists for the whole run, and a ready node is
/// handed over only when a worker is idle, so the concurrency bound holds
/// structurally.
pub struct Executor<I: ActionInvoker> {
    invoker: Arc<I>,
    options: ExecutorOptions,
}

impl<I: ActionInvoker> fmt::Debug for Executor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<I: ActionInvoker> Executor<I> {
    pub fn new(invoker: I, options: ExecutorOptions) -> Self {
        Self::from_arc(Arc::new(invoker), options)
    }

    /// Share an invoker the caller keeps a handle to (tests inspect it).
    pub fn from_arc(invoker: Arc<I>, options: ExecutorOptions) -> Self {
        Self { invoker, options }
    }

    pub fn options(&self) -> ExecutorOptions {
        self.options
    }

    /// Execute every node of `graph`, reading each edge as "source must
    /// succeed before target starts".
    ///
    /// - A cyclic graph is rejected before any action runs.
    /// - The first failure raises the cancellation signal; nothing is
    ///   dispatched afterwards, and the call returns once in-flight actions
    ///   have finished.
    ///
    /// Action failures are reported in the returned [`ExecutionReport`]
    /// (see [`ExecutionReport::into_result`]); `Err` is reserved for
    /// problems with the run itself.
    pub async fn run(&self, graph: &DagGraph) -> Result<ExecutionReport> {
        let max_parallel = self.options.max_parallel;
        if max_parallel == 0 {
            return Err(TfOrderError::ConfigError(
                "max parallel must be >= 1 (got 0)".to_string(),
            ));
        }

        // Cycles are fatal and must be caught before anything runs.
        topo_order(graph, Direction::Forward)?;

        let mut scheduler = Scheduler::new(graph);
        let mut ready: VecDeque<NodeId> = scheduler.start().newly_ready.into();

        if scheduler.node_count() == 0 {
            info!("nothing to execute");
            return Ok(scheduler.report());
        }

        let worker_count = max_parallel.min(scheduler.node_count());
        let signal = CancelSignal::new();

        info!(
            nodes = scheduler.node_count(),
            max_parallel,
            workers = worker_count,
            "executor started"
        );

        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<WorkerEvent>();
        let mut workers = JoinSet::new();
        let mut worker_txs: Vec<mpsc::Sender<NodeId>> = Vec::with_capacity(worker_count);

        for id in 0..worker_count {
            let (tx, rx) = mpsc::channel::<NodeId>(1);
            worker_txs.push(tx);
            workers.spawn(worker_loop(
                id,
                Arc::clone(&self.invoker),
                rx,
                done_tx.clone(),
                signal.token(),
            ));
        }
        drop(done_tx);

        let mut idle: Vec<usize> = (0..worker_count).rev().collect();

        let handle_ctrl_c = self.options.handle_ctrl_c;
        let ctrl_c = async move {
            if handle_ctrl_c && tokio::signal::ctrl_c().await.is_ok() {
                return;
            }
            std::future::pending::<()>().await;
        };
        tokio::pin!(ctrl_c);
        let mut ctrl_c_seen = false;

        let outcome: Result<()> = loop {
            // Hand ready nodes to idle workers.
            while !scheduler.is_cancelled() {
                let Some(&worker) = idle.last() else { break };
                let Some(node) = ready.pop_front() else { break };

                if !scheduler.mark_running(&node) {
                    continue;
                }
                idle.pop();

                debug!(node = %node, worker, "dispatching node");
                if worker_txs[worker].send(node.clone()).await.is_err() {
                    warn!(node = %node, worker, "worker exited before accepting work");
                    let step = scheduler.complete(
                        &node,
                        NodeOutcome::Failed("worker exited unexpectedly".to_string()),
                    );
                    apply_step(step, &signal, &mut ready);
                }
            }

            if scheduler.running_count() == 0 {
                if scheduler.is_finished() {
                    break Ok(());
                }
                break Err(TfOrderError::Other(anyhow!(
                    "executor stalled with {} nodes not started",
                    scheduler.report().not_attempted.len()
                )));
            }

            tokio::select! {
                event = done_rx.recv() => {
                    let Some(event) = event else {
                        break Err(TfOrderError::Other(anyhow!(
                            "all workers exited with {} actions in flight",
                            scheduler.running_count()
                        )));
                    };

                    debug!(
                        node = %event.node,
                        worker = event.worker,
                        success = event.outcome.is_success(),
                        "node finished"
                    );
                    idle.push(event.worker);
                    let step = scheduler.complete(&event.node, NodeOutcome::from(&event.outcome));
                    apply_step(step, &signal, &mut ready);
                }

                _ = &mut ctrl_c, if !ctrl_c_seen => {
                    ctrl_c_seen = true;
                    warn!("Ctrl-C received; stopping dispatch and cancelling running actions");
                    if scheduler.interrupt() {
                        signal.cancel();
                    }
                }
            }
        };

        // Closing the worker channels lets every worker exit its loop.
        drop(worker_txs);
        while let Some(res) = workers.join_next().await {
            if let Err(e) = res {
                warn!(error = %e, "worker task ended abnormally");
            }
        }

        outcome?;

        let report = scheduler.report();
        info!(
            succeeded = report.succeeded.len(),
            not_attempted = report.not_attempted.len(),
            "executor finished"
        );
        Ok(report)
    }
}

fn apply_step(step: SchedulerStep, signal: &CancelSignal, ready: &mut VecDeque<NodeId>) {
    if step.cancel_requested && signal.cancel() {
        info!("cancellation signal raised");
    }
    ready.extend(step.newly_ready);
}

/// One member of the fixed worker pool.
///
/// Each action runs in its own Tokio task so that a panicking invoker turns
/// into a failed node instead of a lost completion event.
async fn worker_loop<I: ActionInvoker>(
    id: usize,
    invoker: Arc<I>,
    mut rx: mpsc::Receiver<NodeId>,
    done_tx: mpsc::UnboundedSender<WorkerEvent>,
    cancel: CancelToken,
) {
    debug!(worker = id, "worker started");

    while let Some(node) = rx.recv().await {
        let invoker = Arc::clone(&invoker);
        let action_node = node.clone();
        let action_cancel = cancel.clone();

        let outcome = match tokio::spawn(async move {
            invoker.invoke(&action_node, action_cancel).await
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(worker = id, node = %node, error = %e, "action task failed");
                ActionOutcome::failed(format!("action task failed: {e}"), String::new())
            }
        };

        if done_tx
            .send(WorkerEvent {
                worker: id,
                node,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }

    debug!(worker = id, "worker finished");
}
