// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tforder`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tforder",
    version,
    about = "Order Terraform stacks by their declared dependencies, render the graph, or run a command in each stack.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to start in.
    #[arg(short = 'd', long = "dir", value_name = "PATH", default_value = ".")]
    pub dir: PathBuf,

    /// Output file (.txt, .dot, .svg, .png).
    ///
    /// If omitted, the order is printed to stdout as a numbered list.
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<String>,

    /// Recursively scan all subdirectories for main.tf files.
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Base path for relative node names (default: current directory).
    #[arg(long, value_name = "PATH")]
    pub relative_to: Option<PathBuf>,

    /// Command to execute in each stack directory, in dependency order.
    #[arg(short = 'x', long, value_name = "CMD")]
    pub execute: Option<String>,

    /// Maximum number of parallel executions (default 2).
    #[arg(long, alias = "maxparallel", value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Reverse dependency order (for destroy operations).
    #[arg(long)]
    pub reverse: bool,

    /// Path to an optional config file (TOML).
    ///
    /// Default: `tforder.toml` in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TFORDER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// With --execute: print the order and concurrency waves, run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_and_alias() {
        let args = CliArgs::try_parse_from([
            "tforder", "-d", "tf/dev", "-r", "-x", "terraform plan", "--maxparallel", "4",
            "--reverse",
        ])
        .unwrap();

        assert_eq!(args.dir, PathBuf::from("tf/dev"));
        assert!(args.recursive);
        assert_eq!(args.execute.as_deref(), Some("terraform plan"));
        assert_eq!(args.max_parallel, Some(4));
        assert!(args.reverse);
        assert!(!args.dry_run);
    }

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["tforder"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.out, None);
        assert_eq!(args.max_parallel, None);
        assert!(args.config.is_none());
    }
}
