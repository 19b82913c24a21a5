// src/dag/mod.rs

//! Dependency graph model, ordering and scheduling.
//!
//! - [`graph`] holds the deduplicated edge set between stacks.
//! - [`order`] computes topological orders (and concurrency waves) with
//!   Kahn's algorithm and reports cycles.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   stacks are ready to run, and when dependents can be dispatched.
//! - [`node_state`] provides the per-node state and outcome types.
//! - [`scheduler_step`] defines the result type for scheduler steps.

pub mod graph;
pub mod node_state;
pub mod order;
pub mod scheduler;
pub mod scheduler_step;

pub use graph::{DagGraph, Edge, NodeId};
pub use node_state::{NodeOutcome, NodeRunState};
pub use order::{topo_order, waves};
pub use scheduler::Scheduler;
pub use scheduler_step::SchedulerStep;
