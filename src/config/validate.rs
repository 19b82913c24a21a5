// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TfOrderError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TfOrderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.exec, raw.discover, raw.render))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_exec(cfg)?;
    validate_discover(cfg)?;
    Ok(())
}

fn validate_exec(cfg: &RawConfigFile) -> Result<()> {
    if cfg.exec.max_parallel == Some(0) {
        return Err(TfOrderError::ConfigError(
            "[exec].max_parallel must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.exec.shell.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(TfOrderError::ConfigError(
            "[exec].shell must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_discover(cfg: &RawConfigFile) -> Result<()> {
    let marker = cfg.discover.marker_file.trim();
    if marker.is_empty() {
        return Err(TfOrderError::ConfigError(
            "[discover].marker_file must not be empty".to_string(),
        ));
    }
    if marker.contains('/') || marker.contains('\\') {
        return Err(TfOrderError::ConfigError(format!(
            "[discover].marker_file must be a file name, not a path (got '{marker}')"
        )));
    }
    Ok(())
}
