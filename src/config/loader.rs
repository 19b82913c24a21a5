// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TfOrderError};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        TfOrderError::ConfigError(format!("reading config {}: {e}", path.display()))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    debug!(path = %path.as_ref().display(), ?config, "config loaded");
    Ok(config)
}

/// Config file picked up from the current directory when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("tforder.toml")
}

/// Resolve and load the config for this run.
///
/// An explicit path must exist. Without one, the default file is used if it
/// is present, otherwise built-in defaults apply (`None`).
pub fn load_optional(explicit: Option<&Path>) -> Result<Option<ConfigFile>> {
    match explicit {
        Some(path) => load_and_validate(path).map(Some),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path).map(Some)
            } else {
                Ok(None)
            }
        }
    }
}
