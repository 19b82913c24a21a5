// src/config/mod.rs

//! Configuration loading and validation for tforder.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Merge file values with command-line flags (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, DiscoverSection, ExecSection, RawConfigFile, RenderSection};
pub use settings::{DEFAULT_MAX_PARALLEL, Settings};
