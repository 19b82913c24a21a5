// tests/config_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;
use tforder::config::{load_and_validate, load_optional};
use tforder::errors::TfOrderError;
use tforder_test_utils::ConfigFileBuilder;

#[test]
fn valid_file_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[exec]
max_parallel = 3
echo_output = false

[discover]
skip_dirs = [".terraform", ".git", "modules"]
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.exec.max_parallel, Some(3));
    assert!(!cfg.exec.echo_output);
    assert_eq!(cfg.discover.marker_file, "main.tf");
    assert_eq!(cfg.discover.skip_dirs.len(), 3);
}

#[test]
fn zero_parallelism_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[exec]\nmax_parallel = 0\n").unwrap();

    match load_and_validate(file.path()) {
        Err(TfOrderError::ConfigError(msg)) => assert!(msg.contains("max_parallel")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[exec\nmax_parallel = ").unwrap();

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TfOrderError::TomlError(_)), "{err:?}");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = load_optional(Some(&missing)).unwrap_err();
    assert!(matches!(err, TfOrderError::ConfigError(_)), "{err:?}");
}

#[test]
fn builder_produces_validated_config() {
    let cfg = ConfigFileBuilder::new()
        .with_max_parallel(5)
        .with_shell("/bin/bash")
        .with_marker_file("stack.hcl")
        .with_relative_to("tf")
        .build();

    assert_eq!(cfg.exec.max_parallel, Some(5));
    assert_eq!(cfg.exec.shell.as_deref(), Some("/bin/bash"));
    assert_eq!(cfg.discover.marker_file, "stack.hcl");
    assert_eq!(cfg.render.relative_to.as_deref(), Some("tf"));
}
