// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod discover;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod paths;
pub mod render;
pub mod types;

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{Settings, load_optional};
use crate::dag::{DagGraph, NodeId, topo_order, waves};
use crate::discover::{discover_following, discover_recursive};
use crate::engine::{Executor, ExecutorOptions};
use crate::errors::{Result, TfOrderError};
use crate::exec::ShellInvoker;
use crate::fs::{FileSystem, RealFileSystem};
use crate::paths::relative_label;
use crate::render::write_numbered_list;
use crate::types::Direction;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and merging with the CLI
/// - stack discovery
/// - ordering (cycles are fatal here, before anything is written or run)
/// - either rendering, or execution through the dependency-aware executor
pub async fn run(args: CliArgs) -> Result<()> {
    let file = load_optional(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file.as_ref())?;
    debug!(?settings, "effective settings");

    let fs = RealFileSystem;
    let graph = discover(&fs, &settings)?;
    let order = topo_order(&graph, settings.direction)?;
    info!(
        nodes = order.len(),
        edges = graph.edges().len(),
        direction = %settings.direction,
        "dependency order computed"
    );

    match settings.execute.as_deref() {
        Some(command) => execute(&settings, command, &graph, &order).await,
        None => {
            let mut stdout = io::stdout();
            let status = render::render(
                &settings.output,
                &graph,
                &order,
                &settings.label_base,
                &mut stdout,
            )
            .await?;
            if let Some(status) = status {
                println!("{status}");
            }
            Ok(())
        }
    }
}

fn discover(fs: &dyn FileSystem, settings: &Settings) -> Result<DagGraph> {
    let start = &settings.start_dir;
    if !fs.exists(start) {
        return Err(TfOrderError::Discovery(format!(
            "Start directory does not exist: {}",
            start.display()
        )));
    }

    if settings.recursive {
        if !fs.is_dir(start) {
            return Err(TfOrderError::Discovery(
                "--recursive can only be used with a directory path".to_string(),
            ));
        }
        discover_recursive(fs, start, &settings.discover)
    } else {
        discover_following(fs, start, &settings.discover)
    }
}

async fn execute(
    settings: &Settings,
    command: &str,
    graph: &DagGraph,
    order: &[NodeId],
) -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "Execution order (reverse={}):",
        settings.direction.is_reverse()
    )?;
    write_numbered_list(&mut stdout, order, &settings.label_base)?;
    writeln!(
        stdout,
        "Executing '{command}' in {} (max parallel: {})",
        settings.direction, settings.max_parallel
    )?;

    if settings.dry_run {
        print_waves(&mut stdout, graph, &settings.label_base)?;
        debug!("dry-run complete (no execution)");
        return Ok(());
    }
    stdout.flush()?;

    let invoker = ShellInvoker::new(command)
        .with_shell(settings.shell.clone())
        .with_echo_output(settings.echo_output);
    let executor = Executor::new(
        invoker,
        ExecutorOptions {
            max_parallel: settings.max_parallel,
            handle_ctrl_c: true,
        },
    );

    // `--reverse` only changes the printed order. Execution always gates on
    // the original edges, so dependencies finish before their dependents.
    let report = executor.run(graph).await?;
    report.log_summary();
    report.into_result()?;

    println!("All executions complete.");
    Ok(())
}

/// Dry-run view: which stacks the executor could run side by side.
fn print_waves<W: Write>(w: &mut W, graph: &DagGraph, base: &Path) -> Result<()> {
    let waves = waves(graph, Direction::Forward)?;
    writeln!(w, "Dry run: {} waves, nothing executed", waves.len())?;
    for (i, wave) in waves.iter().enumerate() {
        let labels: Vec<String> = wave.iter().map(|n| relative_label(base, n)).collect();
        writeln!(w, "  wave {}: {}", i + 1, labels.join(", "))?;
    }
    Ok(())
}
