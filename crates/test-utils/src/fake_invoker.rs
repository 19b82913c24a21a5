use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tforder::exec::{ActionFuture, ActionInvoker, ActionOutcome, ActionStatus, CancelToken};

/// One finished invocation.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub node: String,
    pub started: Instant,
    pub finished: Instant,
    pub status: ActionStatus,
}

#[derive(Debug, Default)]
struct RecorderState {
    current: usize,
    max_concurrency: usize,
    started: Vec<String>,
    records: Vec<RunRecord>,
    invocations: HashMap<String, usize>,
}

/// A fake invoker that:
/// - sleeps for a per-node delay instead of running anything
/// - records start/finish instants and the peak number of concurrent calls
/// - fails the nodes it was told to fail
/// - stops early with `Cancelled` when the token fires (unless told not to)
#[derive(Debug)]
pub struct RecordingInvoker {
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    stopping_early: HashSet<String>,
    honour_cancel: bool,
    state: Mutex<RecorderState>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self {
            default_delay: Duration::from_millis(10),
            delays: HashMap::new(),
            failing: HashSet::new(),
            stopping_early: HashSet::new(),
            honour_cancel: true,
            state: Mutex::new(RecorderState::default()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_node_delay(mut self, node: &str, delay: Duration) -> Self {
        self.delays.insert(node.to_string(), delay);
        self
    }

    /// The action for `node` reports failure after its delay.
    pub fn failing(mut self, node: &str) -> Self {
        self.failing.insert(node.to_string());
        self
    }

    /// The action for `node` reports `Cancelled` on its own, without any
    /// cancellation having been raised.
    pub fn stopping_early(mut self, node: &str) -> Self {
        self.stopping_early.insert(node.to_string());
        self
    }

    /// Let in-flight actions run to the end of their delay even after
    /// cancellation.
    pub fn ignoring_cancellation(mut self) -> Self {
        self.honour_cancel = false;
        self
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn record_of(&self, node: &str) -> Option<RunRecord> {
        self.records().into_iter().find(|r| r.node == node)
    }

    /// Nodes in the order their actions started.
    pub fn started_nodes(&self) -> Vec<String> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn max_concurrency(&self) -> usize {
        self.state.lock().unwrap().max_concurrency
    }

    pub fn invocation_count(&self, node: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .invocations
            .get(node)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_invocations(&self) -> usize {
        self.state.lock().unwrap().invocations.values().sum()
    }

    fn delay_for(&self, node: &str) -> Duration {
        self.delays.get(node).copied().unwrap_or(self.default_delay)
    }
}

impl Default for RecordingInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionInvoker for RecordingInvoker {
    fn invoke<'a>(&'a self, node: &'a str, cancel: CancelToken) -> ActionFuture<'a> {
        Box::pin(async move {
            let started = Instant::now();
            {
                let mut state = self.state.lock().unwrap();
                state.current += 1;
                state.max_concurrency = state.max_concurrency.max(state.current);
                state.started.push(node.to_string());
                *state.invocations.entry(node.to_string()).or_default() += 1;
            }

            let finished_normally = if self.honour_cancel {
                tokio::select! {
                    _ = tokio::time::sleep(self.delay_for(node)) => true,
                    _ = cancel.cancelled() => false,
                }
            } else {
                tokio::time::sleep(self.delay_for(node)).await;
                true
            };

            let status = if !finished_normally || self.stopping_early.contains(node) {
                ActionStatus::Cancelled
            } else if self.failing.contains(node) {
                ActionStatus::Failed(format!("injected failure in {node}"))
            } else {
                ActionStatus::Success
            };

            {
                let mut state = self.state.lock().unwrap();
                state.current -= 1;
                state.records.push(RunRecord {
                    node: node.to_string(),
                    started,
                    finished: Instant::now(),
                    status: status.clone(),
                });
            }

            ActionOutcome {
                status,
                output: format!("ran {node}\n"),
            }
        })
    }
}
