// src/discover/mod.rs

//! Stack discovery: turn a directory tree into a [`DagGraph`](crate::dag::DagGraph).
//!
//! A *stack* is a directory holding a marker file (`main.tf` by default)
//! whose `locals { dependencies { ... } }` block names other stack
//! directories by relative path. Every declared dependency becomes an edge
//! `dependency -> stack`. Node ids are cleaned absolute paths.
//!
//! Two modes:
//! - [`discover_following`]: start at one stack and follow declarations.
//! - [`discover_recursive`]: scan every directory under a root.

pub mod parser;
pub mod walk;

pub use parser::parse_dependencies;
pub use walk::{discover_following, discover_recursive};

/// Knobs for both discovery modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// File that marks a directory as a stack.
    pub marker_file: String,
    /// Directory names never entered by the recursive walk.
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            marker_file: "main.tf".to_string(),
            skip_dirs: vec![".terraform".to_string(), ".git".to_string()],
        }
    }
}
