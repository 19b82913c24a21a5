// tests/order_properties.rs

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use tforder::dag::{DagGraph, Edge, NodeId, topo_order, waves};
use tforder::engine::{Executor, ExecutorOptions};
use tforder::errors::TfOrderError;
use tforder::types::Direction;
use tforder_test_utils::RecordingInvoker;

// Strategy to generate an acyclic graph: an edge only ever points from a
// lower-numbered node to a higher-numbered one.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = DagGraph> {
    (2..=max_nodes).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 1..(n * 3)).prop_map(|pairs| {
            let mut g = DagGraph::new();
            for (a, b) in pairs {
                if a != b {
                    let (lo, hi) = (a.min(b), a.max(b));
                    g.add_edge(name(lo), name(hi));
                }
            }
            g
        })
    })
}

fn name(i: usize) -> NodeId {
    format!("n{i:02}")
}

fn position(order: &[NodeId], node: &str) -> usize {
    order.iter().position(|n| n == node).unwrap()
}

proptest! {
    #[test]
    fn forward_order_is_a_permutation_respecting_edges(g in dag_strategy(12)) {
        let order = topo_order(&g, Direction::Forward).unwrap();

        let as_set: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        prop_assert_eq!(as_set.len(), order.len(), "no duplicates");
        prop_assert_eq!(as_set, g.nodes());

        for e in g.edges() {
            prop_assert!(position(&order, &e.source) < position(&order, &e.target));
        }
    }

    #[test]
    fn reverse_order_flips_every_edge(g in dag_strategy(12)) {
        let rev = topo_order(&g, Direction::Reverse).unwrap();
        for e in g.edges() {
            prop_assert!(position(&rev, &e.target) < position(&rev, &e.source));
        }
        prop_assert_eq!(rev, topo_order(&g.reversed(), Direction::Forward).unwrap());
    }

    #[test]
    fn order_is_stable_across_calls(g in dag_strategy(12)) {
        prop_assert_eq!(
            topo_order(&g, Direction::Forward).unwrap(),
            topo_order(&g, Direction::Forward).unwrap()
        );
    }

    #[test]
    fn waves_only_depend_on_earlier_waves(g in dag_strategy(12)) {
        let waves = waves(&g, Direction::Forward).unwrap();
        let wave_of = |node: &str| waves.iter().position(|w| w.iter().any(|n| n == node)).unwrap();

        let total: usize = waves.iter().map(Vec::len).sum();
        prop_assert_eq!(total, g.node_count());
        for e in g.edges() {
            prop_assert!(wave_of(&e.source) < wave_of(&e.target));
        }
    }

    #[test]
    fn closing_a_chain_is_always_a_cycle(len in 2usize..8) {
        let mut g = DagGraph::new();
        for i in 0..len - 1 {
            g.add_edge(name(i), name(i + 1));
        }
        g.add_edge(name(len - 1), name(0));

        match topo_order(&g, Direction::Forward) {
            Err(TfOrderError::DagCycle { nodes }) => prop_assert_eq!(nodes.len(), len),
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn executor_runs_every_node_once_within_bound(
        g in dag_strategy(10),
        max_parallel in 1usize..4,
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let invoker = Arc::new(RecordingInvoker::new().with_delay(Duration::from_millis(1)));
        let executor = Executor::from_arc(
            Arc::clone(&invoker),
            ExecutorOptions { max_parallel, handle_ctrl_c: false },
        );

        let report = rt.block_on(executor.run(&g)).unwrap();

        prop_assert!(report.is_success());
        prop_assert_eq!(report.succeeded.len(), g.node_count());
        prop_assert!(invoker.max_concurrency() <= max_parallel);
        for node in g.nodes() {
            prop_assert_eq!(invoker.invocation_count(node), 1);
        }
        for Edge { source, target } in g.edges() {
            let s = invoker.record_of(source).unwrap();
            let t = invoker.record_of(target).unwrap();
            prop_assert!(s.finished <= t.started);
        }
    }
}
