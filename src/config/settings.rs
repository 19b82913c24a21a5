// src/config/settings.rs

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::discover::DiscoverOptions;
use crate::errors::{Result, TfOrderError};
use crate::paths::absolutize;
use crate::render::OutputTarget;
use crate::types::Direction;

pub const DEFAULT_MAX_PARALLEL: usize = 2;

/// Effective settings for one run: CLI flag, else config file, else default.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Absolute, cleaned start directory.
    pub start_dir: PathBuf,
    pub recursive: bool,
    pub output: OutputTarget,
    /// Absolute base for relative labels.
    pub label_base: PathBuf,
    pub execute: Option<String>,
    pub max_parallel: usize,
    pub direction: Direction,
    pub shell: Option<String>,
    pub echo_output: bool,
    pub discover: DiscoverOptions,
    pub dry_run: bool,
}

impl Settings {
    pub fn resolve(args: &CliArgs, file: Option<&ConfigFile>) -> Result<Self> {
        let defaults = ConfigFile::default();
        let cfg = file.unwrap_or(&defaults);

        let max_parallel = args
            .max_parallel
            .or(cfg.exec.max_parallel)
            .unwrap_or(DEFAULT_MAX_PARALLEL);
        if max_parallel == 0 {
            return Err(TfOrderError::ConfigError(
                "--max-parallel must be >= 1 (got 0)".to_string(),
            ));
        }

        let label_base = match (&args.relative_to, &cfg.render.relative_to) {
            (Some(cli), _) => absolutize(cli)?,
            (None, Some(file)) => absolutize(PathBuf::from(file).as_path())?,
            (None, None) => absolutize(&PathBuf::from("."))?,
        };

        Ok(Self {
            start_dir: absolutize(&args.dir)?,
            recursive: args.recursive,
            output: OutputTarget::from_out(args.out.as_deref()),
            label_base,
            execute: args.execute.clone().filter(|cmd| !cmd.is_empty()),
            max_parallel,
            direction: Direction::from_reverse_flag(args.reverse),
            shell: cfg.exec.shell.clone(),
            echo_output: cfg.exec.echo_output,
            discover: DiscoverOptions {
                marker_file: cfg.discover.marker_file.clone(),
                skip_dirs: cfg.discover.skip_dirs.clone(),
            },
            dry_run: args.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RawConfigFile;
    use clap::Parser;

    fn args(argv: &[&str]) -> CliArgs {
        let mut full = vec!["tforder"];
        full.extend_from_slice(argv);
        CliArgs::try_parse_from(full).unwrap()
    }

    fn config(text: &str) -> ConfigFile {
        let raw: RawConfigFile = toml::from_str(text).unwrap();
        ConfigFile::try_from(raw).unwrap()
    }

    #[test]
    fn built_in_defaults() {
        let s = Settings::resolve(&args(&["-d", "/tf/dev"]), None).unwrap();
        assert_eq!(s.start_dir, PathBuf::from("/tf/dev"));
        assert_eq!(s.max_parallel, DEFAULT_MAX_PARALLEL);
        assert_eq!(s.direction, Direction::Forward);
        assert_eq!(s.output, OutputTarget::Stdout);
        assert_eq!(s.discover, DiscoverOptions::default());
        assert!(s.echo_output);
        assert!(s.execute.is_none());
    }

    #[test]
    fn cli_wins_over_file() {
        let cfg = config("[exec]\nmax_parallel = 8\n[render]\nrelative_to = \"/from/file\"\n");

        let s = Settings::resolve(
            &args(&["--max-parallel", "3", "--relative-to", "/from/cli"]),
            Some(&cfg),
        )
        .unwrap();
        assert_eq!(s.max_parallel, 3);
        assert_eq!(s.label_base, PathBuf::from("/from/cli"));

        let s = Settings::resolve(&args(&[]), Some(&cfg)).unwrap();
        assert_eq!(s.max_parallel, 8);
        assert_eq!(s.label_base, PathBuf::from("/from/file"));
    }

    #[test]
    fn zero_parallelism_from_cli_is_rejected() {
        let err = Settings::resolve(&args(&["--max-parallel", "0"]), None).unwrap_err();
        assert!(matches!(err, TfOrderError::ConfigError(_)));
    }

    #[test]
    fn reverse_flag_sets_direction() {
        let s = Settings::resolve(&args(&["--reverse", "-x", "terraform destroy"]), None).unwrap();
        assert_eq!(s.direction, Direction::Reverse);
        assert_eq!(s.execute.as_deref(), Some("terraform destroy"));
    }
}
