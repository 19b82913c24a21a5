// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::dag::NodeId;

#[derive(Error, Debug)]
pub enum TfOrderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cycle detected in dependency graph involving: {}", .nodes.join(", "))]
    DagCycle { nodes: Vec<NodeId> },

    #[error("Action failed in {node}: {cause}")]
    ActionFailed { node: NodeId, cause: String },

    #[error("Execution interrupted before all stacks ran")]
    Interrupted,

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TfOrderError>;
